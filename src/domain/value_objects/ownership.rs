//! Owning user/group for deployed files

/// Owner applied to the deploy root and created directories
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ownership {
    pub user: Option<String>,
    pub group: Option<String>,
}

impl Ownership {
    pub fn new(user: Option<String>, group: Option<String>) -> Self {
        Self { user, group }
    }

    pub fn is_unset(&self) -> bool {
        self.user.is_none() && self.group.is_none()
    }

    /// Owner spec for `chown`, or `None` when nothing is configured.
    ///
    /// A lone user is passed without a trailing colon so chown does not
    /// switch the group to the user's login group.
    pub fn chown_spec(&self) -> Option<String> {
        match (&self.user, &self.group) {
            (None, None) => None,
            (Some(user), None) => Some(user.clone()),
            (None, Some(group)) => Some(format!(":{}", group)),
            (Some(user), Some(group)) => Some(format!("{}:{}", user, group)),
        }
    }
}
