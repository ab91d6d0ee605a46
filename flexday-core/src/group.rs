//! Growth groups the user can join or create.
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub is_family: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub joined: bool,
    pub invite_code: String,
}

impl Group {
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    fn add_member(&mut self, member: &str) {
        if !self.members.iter().any(|m| m == member) {
            self.members.push(member.to_string());
        }
        self.joined = true;
    }
}

/// Groups known to this client. Membership is a local flag only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupDirectory {
    groups: Vec<Group>,
    #[serde(default)]
    created_seq: u32,
}

impl GroupDirectory {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sample groups shown before any are created.
    #[must_use]
    pub fn sample() -> Self {
        fn group(
            id: &str,
            name: &str,
            description: &str,
            members: usize,
            is_private: bool,
            tags: &[&str],
            code: &str,
        ) -> Group {
            Group {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
                members: (1..=members).map(|n| format!("{id}-member-{n}")).collect(),
                is_family: false,
                is_private,
                tags: tags.iter().map(ToString::to_string).collect(),
                joined: false,
                invite_code: code.to_string(),
            }
        }

        Self {
            groups: vec![
                group(
                    "group1",
                    "Growing Together",
                    "Grow through small everyday changes",
                    8,
                    false,
                    &["daily", "growth", "flexibility"],
                    "GROW-0001",
                ),
                group(
                    "group2",
                    "Workplace Talk Circle",
                    "Build communication skills for working life",
                    12,
                    false,
                    &["work", "communication", "relationships"],
                    "TALK-0002",
                ),
                group(
                    "group3",
                    "Mindful Journey",
                    "A journey toward emotional balance",
                    5,
                    true,
                    &["emotion", "wellbeing", "healing"],
                    "MIND-0003",
                ),
            ],
            created_seq: 0,
        }
    }

    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    #[must_use]
    pub fn joined(&self) -> Vec<&Group> {
        self.groups.iter().filter(|g| g.joined).collect()
    }

    /// Join a listed group.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownGroup`], or [`ValidationError::PrivateGroup`]
    /// since private groups only open with an invite code.
    pub fn join(&mut self, id: &str, member: &str) -> Result<&Group, ValidationError> {
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| ValidationError::UnknownGroup(id.to_string()))?;
        if group.is_private {
            log::debug!("refused listing join for private group {id}");
            return Err(ValidationError::PrivateGroup(id.to_string()));
        }
        group.add_member(member);
        log::info!("joined group {id}");
        Ok(group)
    }

    /// Join any group, private included, by its invite code.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] for a blank code and
    /// [`ValidationError::UnknownGroup`] when nothing matches.
    pub fn join_with_code(&mut self, code: &str, member: &str) -> Result<&Group, ValidationError> {
        let code = ValidationError::require_text("invite code", code)?;
        let group = self
            .groups
            .iter_mut()
            .find(|g| g.invite_code.eq_ignore_ascii_case(code))
            .ok_or_else(|| ValidationError::UnknownGroup(code.to_string()))?;
        group.add_member(member);
        log::info!("joined group {} with invite code", group.id);
        Ok(group)
    }

    /// Create a group owned and joined by `owner`.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptyField`] when the name is blank.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        is_family: bool,
        owner: &str,
    ) -> Result<&Group, ValidationError> {
        let name = ValidationError::require_text("name", name)?;
        self.created_seq = self.created_seq.saturating_add(1);
        let seq = self.created_seq;
        let prefix = if is_family { "FAM" } else { "FLEX" };
        let mut group = Group {
            id: format!("created-{seq}"),
            name: name.to_string(),
            description: description.trim().to_string(),
            members: Vec::new(),
            is_family,
            is_private: is_family,
            tags: Vec::new(),
            joined: false,
            invite_code: format!("{prefix}-{seq:04}"),
        };
        group.add_member(owner);
        log::info!("created group {} ({})", group.id, group.name);
        self.groups.push(group);
        let idx = self.groups.len() - 1;
        Ok(&self.groups[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_group_joins_from_listing() {
        let mut dir = GroupDirectory::sample();
        let group = dir.join("group1", "me").unwrap();
        assert!(group.joined);
        assert_eq!(group.member_count(), 9);
        // rejoining does not duplicate membership
        assert_eq!(dir.join("group1", "me").unwrap().member_count(), 9);
        assert_eq!(dir.joined().len(), 1);
    }

    #[test]
    fn private_group_needs_code() {
        let mut dir = GroupDirectory::sample();
        assert_eq!(
            dir.join("group3", "me").unwrap_err(),
            ValidationError::PrivateGroup("group3".into())
        );
        assert!(!dir.get("group3").unwrap().joined);
        let group = dir.join_with_code(" mind-0003 ", "me").unwrap();
        assert_eq!(group.id, "group3");
        assert!(group.joined);
    }

    #[test]
    fn unknown_ids_and_codes_fail() {
        let mut dir = GroupDirectory::sample();
        assert!(matches!(
            dir.join("nope", "me"),
            Err(ValidationError::UnknownGroup(_))
        ));
        assert!(matches!(
            dir.join_with_code("", "me"),
            Err(ValidationError::EmptyField { .. })
        ));
        assert!(matches!(
            dir.join_with_code("XXXX", "me"),
            Err(ValidationError::UnknownGroup(_))
        ));
    }

    #[test]
    fn create_validates_name_and_joins_owner() {
        let mut dir = GroupDirectory::empty();
        assert!(dir.create("  ", "", false, "me").is_err());
        assert!(dir.groups().is_empty());

        let family = dir.create("Our Family", "", true, "me").unwrap();
        assert!(family.is_family);
        assert!(family.is_private);
        assert_eq!(family.invite_code, "FAM-0001");
        assert_eq!(family.members, vec!["me".to_string()]);

        let club = dir.create("Book Club", " reading ", false, "me").unwrap();
        assert_eq!(club.id, "created-2");
        assert_eq!(club.description, "reading");
    }
}
