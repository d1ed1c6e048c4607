//! Whitelisted equality filters for the incident listing.
//!
//! Only the fields enumerated in [`FilterField`] can be filtered on. Anything
//! else in the query string is dropped without error, so parameter names can
//! never reach the SQL text except through [`FilterField::column`].

use crate::types::Incident;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
  IncidentState,
  OpenedBy,
  Category,
  Urgency,
  AssignmentGroup,
}

impl FilterField {
  pub const ALL: [FilterField; 5] = [
    Self::IncidentState,
    Self::OpenedBy,
    Self::Category,
    Self::Urgency,
    Self::AssignmentGroup,
  ];

  /// Match a query-parameter name exactly (case-sensitive).
  pub fn from_param(name: &str) -> Option<Self> {
    match name {
      "incident_state" => Some(Self::IncidentState),
      "opened_by" => Some(Self::OpenedBy),
      "category" => Some(Self::Category),
      "urgency" => Some(Self::Urgency),
      "assignment_group" => Some(Self::AssignmentGroup),
      _ => None,
    }
  }

  pub fn column(self) -> &'static str {
    match self {
      Self::IncidentState => "incident_state",
      Self::OpenedBy => "opened_by",
      Self::Category => "category",
      Self::Urgency => "urgency",
      Self::AssignmentGroup => "assignment_group",
    }
  }

  pub fn value_of(self, incident: &Incident) -> &str {
    match self {
      Self::IncidentState => &incident.incident_state,
      Self::OpenedBy => &incident.opened_by,
      Self::Category => &incident.category,
      Self::Urgency => &incident.urgency,
      Self::AssignmentGroup => &incident.assignment_group,
    }
  }
}

/// Accepted filter conditions, ANDed together. At most one value per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
  conditions: Vec<(FilterField, String)>,
}

impl Filters {
  /// Build from raw query pairs in request order. The first value for a
  /// field wins; later repeats are ignored.
  pub fn from_pairs<'a, I>(pairs: I) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut conditions: Vec<(FilterField, String)> = Vec::new();
    for (name, value) in pairs {
      let Some(field) = FilterField::from_param(name) else {
        continue;
      };
      if conditions.iter().any(|(f, _)| *f == field) {
        continue;
      }
      conditions.push((field, value.to_string()));
    }
    Self { conditions }
  }

  pub fn is_empty(&self) -> bool {
    self.conditions.is_empty()
  }

  pub fn len(&self) -> usize {
    self.conditions.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = (FilterField, &str)> {
    self.conditions.iter().map(|(f, v)| (*f, v.as_str()))
  }

  pub fn matches(&self, incident: &Incident) -> bool {
    self.iter().all(|(field, value)| field.value_of(incident) == value)
  }
}
