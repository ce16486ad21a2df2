use serde::{
  Deserialize,
  Serialize,
};

/// Optional identity carried by a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateId {
  Number(i64),
  Text(String),
}

/// A selectable suggestion. Only the display name is required; hosts may
/// attach an identity for stable list diffing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:   Option<CandidateId>,
}

impl Candidate {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      id:   None,
    }
  }

  pub fn with_id(name: impl Into<String>, id: CandidateId) -> Self {
    Self {
      name: name.into(),
      id:   Some(id),
    }
  }

  /// Identity used for list diffing: the `id` field when both records carry
  /// one, whole-value equality otherwise.
  pub fn same_identity(&self, other: &Candidate) -> bool {
    match (&self.id, &other.id) {
      (Some(a), Some(b)) => a == b,
      _ => self == other,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn identity_prefers_ids() {
    let a = Candidate::with_id("Alice", CandidateId::Number(1));
    let renamed = Candidate::with_id("Alicia", CandidateId::Number(1));
    let other = Candidate::with_id("Alice", CandidateId::Number(2));
    assert!(a.same_identity(&renamed));
    assert!(!a.same_identity(&other));
  }

  #[test]
  fn identity_falls_back_to_value() {
    let a = Candidate::new("Alice");
    let same = Candidate::new("Alice");
    let other = Candidate::new("Bob");
    assert!(a.same_identity(&same));
    assert!(!a.same_identity(&other));
  }

  #[test]
  fn deserializes_with_and_without_id() {
    let with: Candidate = serde_json::from_str(r#"{"name": "Alice", "id": 7}"#).unwrap();
    assert_eq!(with.id, Some(CandidateId::Number(7)));
    let without: Candidate = serde_json::from_str(r#"{"name": "Bob"}"#).unwrap();
    assert_eq!(without.id, None);
  }
}
