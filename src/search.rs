// src/search.rs
//
// Free-text filtering over a held complaint collection.

use crate::models::{Complaint, User};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trimmed, lower-cased query. Empty means "match everything".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query(String);

impl Query {
    pub fn new(raw: &str) -> Self {
        Query(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Field that produced a match, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedField {
    Description,
    ContactPerson,
    Status,
    Department,
    Email,
    Type,
    Date,
    Phone,
}

fn contains_folded(field: Option<&str>, q: &str) -> bool {
    field.map_or(false, |v| v.to_lowercase().contains(q))
}

/// First field of `c` containing `q`, or `None`.
///
/// The date is checked only when present; phone is still checked when it
/// is not.
pub fn matched_field(c: &Complaint, q: &Query) -> Option<MatchedField> {
    let q = q.as_str();
    let text_fields = [
        (MatchedField::Description, c.description.as_deref()),
        (MatchedField::ContactPerson, c.contact_person.as_deref()),
        (MatchedField::Status, c.status.as_deref()),
        (MatchedField::Department, c.department.as_deref()),
        (MatchedField::Email, c.email.as_deref()),
        (MatchedField::Type, c.complaint_type.as_deref()),
    ];
    if let Some((field, _)) = text_fields.iter().find(|(_, v)| contains_folded(*v, q)) {
        return Some(*field);
    }
    if let Some(date) = c.created_at {
        if date.format(DATE_FORMAT).to_string().contains(q) {
            return Some(MatchedField::Date);
        }
    }
    if contains_folded(c.phone.as_deref(), q) {
        return Some(MatchedField::Phone);
    }
    None
}

pub fn matches(c: &Complaint, q: &Query) -> bool {
    q.is_empty() || matched_field(c, q).is_some()
}

/// Ordered subsequence of `complaints` matching `query`.
pub fn filter_complaints(complaints: &[Complaint], query: &str) -> Vec<Complaint> {
    let q = Query::new(query);
    complaints.iter().filter(|c| matches(c, &q)).cloned().collect()
}

/// User-management search: name only.
pub fn filter_users(users: &[User], query: &str) -> Vec<User> {
    let q = Query::new(query);
    users
        .iter()
        .filter(|u| q.is_empty() || u.name.to_lowercase().contains(q.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn complaint(id: &str, description: &str, status: &str, department: &str) -> Complaint {
        Complaint {
            id: id.into(),
            department: Some(department.into()),
            complaint_type: Some("General".into()),
            contact_person: Some("Meera".into()),
            phone: Some("9123456780".into()),
            email: Some(format!("{id}@x.com")),
            description: Some(description.into()),
            status: Some(status.into()),
            remarks: Some(String::new()),
            priority: Some("Low".into()),
            location: Some("Hostel".into()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap()),
        }
    }

    fn sample() -> Vec<Complaint> {
        vec![
            complaint("c1", "Fan not working", "Resolved", "Electrical"),
            complaint("c2", "Broken bench", "New", "Civil"),
            complaint("c3", "Projector flicker", "In Progress", "Computer Science"),
        ]
    }

    fn ids(list: &[Complaint]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn empty_or_blank_query_returns_everything_in_order() {
        let list = sample();
        assert_eq!(filter_complaints(&list, ""), list);
        assert_eq!(filter_complaints(&list, "   \t"), list);
    }

    #[test]
    fn query_is_case_insensitive() {
        let list = sample();
        assert_eq!(filter_complaints(&list, "REsolved"), filter_complaints(&list, "resolved"));
        assert_eq!(ids(&filter_complaints(&list, "REsolved")), vec!["c1"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let list = sample();
        for q in ["c", "bench", "2024-03", "nothing here", ""] {
            let once = filter_complaints(&list, q);
            assert_eq!(filter_complaints(&once, q), once);
        }
    }

    #[test]
    fn matches_department_email_and_type() {
        let list = sample();
        assert_eq!(ids(&filter_complaints(&list, "civil")), vec!["c2"]);
        assert_eq!(ids(&filter_complaints(&list, "c3@x")), vec!["c3"]);
        assert_eq!(filter_complaints(&list, "general").len(), 3);
    }

    #[test]
    fn matches_formatted_date() {
        let list = sample();
        assert_eq!(filter_complaints(&list, "2024-03-15").len(), 3);
        assert!(filter_complaints(&list, "15/03/2024").is_empty());
    }

    #[test]
    fn null_date_still_matches_on_phone() {
        let c = Complaint {
            id: "p1".into(),
            department: Some("Civil".into()),
            complaint_type: None,
            contact_person: None,
            phone: Some("9999999999".into()),
            email: Some("a@x.com".into()),
            description: Some("Leaking pipe".into()),
            status: Some("New".into()),
            remarks: None,
            priority: None,
            location: None,
            created_at: None,
        };
        assert_eq!(matched_field(&c, &Query::new("9999")), Some(MatchedField::Phone));
        assert_eq!(filter_complaints(&[c], "9999").len(), 1);
    }

    #[test]
    fn first_matching_field_wins() {
        let c = complaint("c9", "new fan", "New", "Electrical");
        assert_eq!(matched_field(&c, &Query::new("new")), Some(MatchedField::Description));
        assert_eq!(matched_field(&c, &Query::new("electrical")), Some(MatchedField::Department));
    }

    #[test]
    fn absent_fields_are_skipped() {
        let mut c = complaint("c1", "x", "New", "Civil");
        c.description = None;
        c.contact_person = None;
        assert_eq!(matched_field(&c, &Query::new("civil")), Some(MatchedField::Department));
        assert!(matched_field(&c, &Query::new("meera")).is_none());
    }

    #[test]
    fn no_match_gives_empty_result() {
        assert!(filter_complaints(&sample(), "zzz").is_empty());
    }

    #[test]
    fn users_filter_by_name_only() {
        let user = |name: &str, email: &str| User {
            id: email.into(),
            name: name.into(),
            email: email.into(),
            phone: "1".into(),
            role: "client".into(),
            status: "pending".into(),
            created_at: Utc::now(),
        };
        let users = vec![user("Anita Rao", "anita@x.com"), user("Vikram", "rao@x.com")];
        let found = filter_users(&users, "RAO");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Anita Rao");
        assert_eq!(filter_users(&users, " ").len(), 2);
    }
}
