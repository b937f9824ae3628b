use serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned};

use super::Change;
use crate::{
    errors::ChangeError,
    span::{Span, Spans},
    utils::side::Side,
};

/// Borrowed view of a change in its wire format.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangeRecordRef<'a, D> {
    from_a: usize,
    to_a: usize,
    from_b: usize,
    to_b: usize,
    deleted: &'a [Span<D>],
    inserted: &'a [Span<D>],
}

/// A change as read from the wire, before its ranges are validated.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeRecord<D> {
    from_a: usize,
    to_a: usize,
    from_b: usize,
    to_b: usize,
    deleted: Vec<Span<D>>,
    inserted: Vec<Span<D>>,
}

impl<D> TryFrom<ChangeRecord<D>> for Change<D>
where
    D: Clone,
{
    type Error = ChangeError;

    fn try_from(record: ChangeRecord<D>) -> Result<Self, Self::Error> {
        let deleted = validate_side(Side::A, record.from_a, record.to_a, record.deleted)?;
        let inserted = validate_side(Side::B, record.from_b, record.to_b, record.inserted)?;

        Ok(Change::new(
            record.from_a,
            record.to_a,
            record.from_b,
            record.to_b,
            deleted,
            inserted,
        ))
    }
}

fn validate_side<D>(
    side: Side,
    from: usize,
    to: usize,
    spans: Vec<Span<D>>,
) -> Result<Spans<D>, ChangeError>
where
    D: Clone,
{
    if to < from {
        return Err(ChangeError::InvertedRange { side, from, to });
    }

    let actual = Span::len_of(&spans);
    if actual != to - from {
        return Err(ChangeError::SpanLengthMismatch {
            side,
            expected: to - from,
            actual,
        });
    }

    Ok(spans.into())
}

impl<D> Serialize for Change<D>
where
    D: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ChangeRecordRef {
            from_a: self.from_a,
            to_a: self.to_a,
            from_b: self.from_b,
            to_b: self.to_b,
            deleted: &self.deleted,
            inserted: &self.inserted,
        }
        .serialize(serializer)
    }
}

impl<'de, D> Deserialize<'de> for Change<D>
where
    D: Deserialize<'de> + Clone,
{
    fn deserialize<De>(deserializer: De) -> Result<Self, De::Error>
    where
        De: Deserializer<'de>,
    {
        let record = ChangeRecord::deserialize(deserializer)?;
        Change::try_from(record).map_err(serde::de::Error::custom)
    }
}

impl<D> Change<D>
where
    D: Clone + Serialize + DeserializeOwned,
{
    /// Serializes the change as
    /// `{fromA, toA, fromB, toB, deleted: [{length, data}], inserted: [...]}`.
    pub fn to_json(&self) -> Result<String, ChangeError> { Ok(serde_json::to_string(self)?) }

    pub fn to_json_value(&self) -> Result<serde_json::Value, ChangeError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parses a change stored with `to_json`. Records whose ranges are
    /// inverted or whose spans don't cover their range are rejected.
    pub fn from_json(json: &str) -> Result<Self, ChangeError> {
        let record: ChangeRecord<D> = serde_json::from_str(json)?;
        Change::try_from(record)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ChangeError> {
        let record: ChangeRecord<D> = serde_json::from_value(value)?;
        Change::try_from(record)
    }

    /// Parses a JSON array of changes, such as a persisted change history.
    pub fn vec_from_json(json: &str) -> Result<Vec<Self>, ChangeError> {
        let records: Vec<ChangeRecord<D>> = serde_json::from_str(json)?;
        records.into_iter().map(Change::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn example() -> Change<String> {
        Change::new(
            6,
            11,
            6,
            12,
            vec![Span::new(5, "alice".to_owned())].into(),
            vec![
                Span::new(2, "bob".to_owned()),
                Span::new(4, "carol".to_owned()),
            ]
            .into(),
        )
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            example().to_json_value().unwrap(),
            json!({
                "fromA": 6,
                "toA": 11,
                "fromB": 6,
                "toB": 12,
                "deleted": [{ "length": 5, "data": "alice" }],
                "inserted": [
                    { "length": 2, "data": "bob" },
                    { "length": 4, "data": "carol" }
                ]
            })
        );
    }

    #[test]
    fn test_from_json_restores_change() {
        let change = example();

        let restored = Change::<String>::from_json(&change.to_json().unwrap()).unwrap();

        assert_eq!(restored, change);
    }

    #[test]
    fn test_vec_from_json() {
        let json = serde_json::to_string(&vec![example(), example()]).unwrap();

        let restored = Change::<String>::vec_from_json(&json).unwrap();

        assert_eq!(restored, vec![example(), example()]);
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = Change::<String>::from_json_value(json!({
            "fromA": 4, "toA": 2, "fromB": 0, "toB": 0, "deleted": [], "inserted": []
        }));

        assert!(matches!(
            result,
            Err(ChangeError::InvertedRange {
                side: Side::A,
                from: 4,
                to: 2
            })
        ));
    }

    #[test]
    fn test_rejects_spans_not_covering_range() {
        let result = Change::<String>::from_json_value(json!({
            "fromA": 0, "toA": 0, "fromB": 1, "toB": 4,
            "deleted": [],
            "inserted": [{ "length": 2, "data": "bob" }]
        }));

        assert!(matches!(
            result,
            Err(ChangeError::SpanLengthMismatch {
                side: Side::B,
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_rejects_missing_field() {
        let result = Change::<String>::from_json(r#"{"fromA": 0, "toA": 0, "fromB": 0}"#);

        assert!(matches!(result, Err(ChangeError::Json(_))));
    }

    #[test]
    fn test_deserialize_impl_validates() {
        let result: Result<Change<String>, _> = serde_json::from_value(json!({
            "fromA": 0, "toA": 1, "fromB": 0, "toB": 0, "deleted": [], "inserted": []
        }));

        assert!(result.is_err());
    }
}
