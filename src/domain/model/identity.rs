use serde::{Serialize, Serializer};

/// Numeric id of the account that posted a tweet.
///
/// Serialized as the bare number, or as `""` when the upstream record
/// carried no id.
#[derive(Clone, Debug, PartialEq, Default, Eq, Hash)]
pub struct AccountID(pub Option<u64>);

impl Serialize for AccountID {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0 {
            Some(id) => serializer.serialize_u64(id),
            None => serializer.serialize_str(""),
        }
    }
}

// u64 to AccountID
impl From<u64> for AccountID {
    fn from(id: u64) -> Self {
        AccountID(Some(id))
    }
}

// Option<u64> to AccountID
impl From<Option<u64>> for AccountID {
    fn from(id: Option<u64>) -> Self {
        AccountID(id)
    }
}
