//! Folding per-chunk and per-part field sets into one record
//!
//! Conflicts are resolved by the shape pair of the two values:
//!
//! | existing \ incoming | Scored            | List          | Object            | Scalar   |
//! |---------------------|-------------------|---------------|-------------------|----------|
//! | Scored              | higher confidence | prepend, concat | union, reclassify | existing |
//! | List                | incoming if > 0   | concat        | incoming          | existing |
//! | Object              | incoming if > 0   | prepend, concat | union           | existing |
//! | Scalar              | incoming if > 0   | prepend, concat | incoming        | existing |
//!
//! Equal confidences keep the existing value, so the first chunk (or part) to
//! report a field wins ties.

use estimator_domain::{FieldSet, FieldValue, MergedRecord};
use serde_json::Value;

/// Merge `incoming` into `existing`
pub fn merge(mut existing: MergedRecord, incoming: &FieldSet) -> MergedRecord {
    for (key, value) in incoming {
        match existing.get_mut(key) {
            Some(slot) => {
                let current = std::mem::replace(slot, FieldValue::Scalar(Value::Null));
                *slot = merge_value(current, value);
            }
            None => {
                existing.insert(key.clone(), value.clone());
            }
        }
    }
    existing
}

/// Left fold of [`merge`] starting from an empty record
pub fn merge_all<'a, I>(sets: I) -> MergedRecord
where
    I: IntoIterator<Item = &'a FieldSet>,
{
    sets.into_iter().fold(MergedRecord::new(), merge)
}

fn merge_value(existing: FieldValue, incoming: &FieldValue) -> FieldValue {
    match (existing, incoming) {
        (FieldValue::Scored(current), FieldValue::Scored(next)) => {
            if next.confidence > current.confidence {
                FieldValue::Scored(next.clone())
            } else {
                FieldValue::Scored(current)
            }
        }
        (current, FieldValue::Scored(next)) => {
            if next.confidence > 0.0 {
                FieldValue::Scored(next.clone())
            } else {
                current
            }
        }

        (FieldValue::List(mut items), FieldValue::List(more)) => {
            items.extend(more.iter().cloned());
            FieldValue::List(items)
        }
        (FieldValue::Scalar(Value::Null), FieldValue::List(more)) => FieldValue::List(more.clone()),
        (current, FieldValue::List(more)) => {
            let mut items = Vec::with_capacity(more.len() + 1);
            items.push(current.into_value());
            items.extend(more.iter().cloned());
            FieldValue::List(items)
        }

        (FieldValue::Object(mut map), FieldValue::Object(more)) => {
            map.extend(more.iter().map(|(k, v)| (k.clone(), v.clone())));
            FieldValue::from(Value::Object(map))
        }
        (FieldValue::Scored(current), FieldValue::Object(more)) => {
            let mut map = current.to_object();
            map.extend(more.iter().map(|(k, v)| (k.clone(), v.clone())));
            FieldValue::from(Value::Object(map))
        }
        (FieldValue::List(_) | FieldValue::Scalar(_), FieldValue::Object(more)) => {
            FieldValue::Object(more.clone())
        }

        (current, FieldValue::Scalar(_)) => current,
    }
}
