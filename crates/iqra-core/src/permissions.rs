//! Group permission resolution.
//!
//! A guarded route declares a [`HandlerPolicy`]: the model it governs and the
//! named action each HTTP method performs. The resolver turns a policy and an
//! incoming method into a required codename of the form
//! `{action}_{model_name}` (for example `view_studentprofile`), which is then
//! checked against the codenames granted to the caller's groups.
//!
//! Resolution is fail-closed. A policy with no governed model, or a method
//! that maps to no action, yields no codename and the request is denied.
//! Superusers bypass the lookup entirely.
//!
//! # Example
//!
//! ```ignore
//! use axum::http::Method;
//! use iqra_core::permissions::*;
//!
//! let policy = HandlerPolicy::new()
//!     .governs(GovernedModel::StudentProfile)
//!     .action(Method::GET, HandlerAction::List)
//!     .action(Method::POST, HandlerAction::Create);
//!
//! let required = required_codename(&policy, &Method::POST);
//! assert_eq!(required.as_deref(), Some("add_studentprofile"));
//! ```

use std::collections::HashSet;
use std::fmt;

use axum::http::Method;

/// The four permission categories every model carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodenameAction {
    View,
    Add,
    Change,
    Delete,
}

impl CodenameAction {
    pub const ALL: [CodenameAction; 4] = [Self::View, Self::Add, Self::Change, Self::Delete];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }

    /// Fallback table used when a handler declares no named action.
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET | Method::HEAD | Method::OPTIONS => Some(Self::View),
            Method::POST => Some(Self::Add),
            Method::PUT | Method::PATCH => Some(Self::Change),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for CodenameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named handler actions, as exposed by resource-style routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerAction {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
}

impl HandlerAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Retrieve => "retrieve",
            Self::Create => "create",
            Self::Update => "update",
            Self::PartialUpdate => "partial_update",
            Self::Destroy => "destroy",
        }
    }

    pub const fn codename_action(self) -> CodenameAction {
        match self {
            Self::List | Self::Retrieve => CodenameAction::View,
            Self::Create => CodenameAction::Add,
            Self::Update | Self::PartialUpdate => CodenameAction::Change,
            Self::Destroy => CodenameAction::Delete,
        }
    }
}

impl fmt::Display for HandlerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models whose access is governed by group permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GovernedModel {
    User,
    StudentProfile,
    TeacherProfile,
    Group,
}

impl GovernedModel {
    pub const ALL: [GovernedModel; 4] = [
        Self::User,
        Self::StudentProfile,
        Self::TeacherProfile,
        Self::Group,
    ];

    /// Lowercased model name used as the codename suffix.
    pub const fn model_name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::StudentProfile => "studentprofile",
            Self::TeacherProfile => "teacherprofile",
            Self::Group => "group",
        }
    }

    pub fn codename(self, action: CodenameAction) -> String {
        format!("{}_{}", action.as_str(), self.model_name())
    }
}

/// Every codename the system knows about, in model-then-action order.
pub fn all_codenames() -> Vec<String> {
    GovernedModel::ALL
        .iter()
        .flat_map(|model| CodenameAction::ALL.iter().map(|action| model.codename(*action)))
        .collect()
}

/// Static access declaration attached to a guarded route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerPolicy {
    model: Option<GovernedModel>,
    actions: Vec<(Method, HandlerAction)>,
}

impl HandlerPolicy {
    /// An empty policy governs nothing and therefore denies every request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn governs(mut self, model: GovernedModel) -> Self {
        self.model = Some(model);
        self
    }

    /// Declares the named action a method performs. A later declaration for
    /// the same method replaces the earlier one.
    pub fn action(mut self, method: Method, action: HandlerAction) -> Self {
        self.actions.retain(|(m, _)| *m != method);
        self.actions.push((method, action));
        self
    }

    pub fn model(&self) -> Option<GovernedModel> {
        self.model
    }

    pub fn named_action(&self, method: &Method) -> Option<HandlerAction> {
        self.actions
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, action)| *action)
    }

    /// Named action first, then the method table.
    pub fn resolve_action(&self, method: &Method) -> Option<CodenameAction> {
        self.named_action(method)
            .map(HandlerAction::codename_action)
            .or_else(|| CodenameAction::from_method(method))
    }
}

/// The codename a request must hold, or `None` when the policy cannot resolve
/// one (which callers treat as a denial).
pub fn required_codename(policy: &HandlerPolicy, method: &Method) -> Option<String> {
    let model = policy.model()?;
    let action = policy.resolve_action(method)?;
    Some(model.codename(action))
}

pub fn has_group_permission(
    is_superuser: bool,
    required: Option<&str>,
    granted: &HashSet<String>,
) -> bool {
    if is_superuser {
        return true;
    }

    match required {
        Some(codename) => granted.contains(codename),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn granted(codenames: &[&str]) -> HashSet<String> {
        codenames.iter().map(|c| c.to_string()).collect()
    }

    fn student_profile_policy() -> HandlerPolicy {
        HandlerPolicy::new()
            .governs(GovernedModel::StudentProfile)
            .action(Method::GET, HandlerAction::List)
            .action(Method::POST, HandlerAction::Create)
    }

    #[test]
    fn test_named_action_table() {
        let expected = [
            (HandlerAction::List, CodenameAction::View),
            (HandlerAction::Retrieve, CodenameAction::View),
            (HandlerAction::Create, CodenameAction::Add),
            (HandlerAction::Update, CodenameAction::Change),
            (HandlerAction::PartialUpdate, CodenameAction::Change),
            (HandlerAction::Destroy, CodenameAction::Delete),
        ];
        for (action, codename_action) in expected {
            assert_eq!(action.codename_action(), codename_action, "{}", action);
        }
    }

    #[test]
    fn test_method_table() {
        assert_eq!(CodenameAction::from_method(&Method::GET), Some(CodenameAction::View));
        assert_eq!(CodenameAction::from_method(&Method::HEAD), Some(CodenameAction::View));
        assert_eq!(
            CodenameAction::from_method(&Method::OPTIONS),
            Some(CodenameAction::View)
        );
        assert_eq!(CodenameAction::from_method(&Method::POST), Some(CodenameAction::Add));
        assert_eq!(CodenameAction::from_method(&Method::PUT), Some(CodenameAction::Change));
        assert_eq!(
            CodenameAction::from_method(&Method::PATCH),
            Some(CodenameAction::Change)
        );
        assert_eq!(
            CodenameAction::from_method(&Method::DELETE),
            Some(CodenameAction::Delete)
        );
        assert_eq!(CodenameAction::from_method(&Method::TRACE), None);
        assert_eq!(CodenameAction::from_method(&Method::CONNECT), None);
    }

    #[test]
    fn test_required_codename_uses_named_action() {
        let policy = student_profile_policy();
        assert_eq!(
            required_codename(&policy, &Method::GET).as_deref(),
            Some("view_studentprofile")
        );
        assert_eq!(
            required_codename(&policy, &Method::POST).as_deref(),
            Some("add_studentprofile")
        );
    }

    #[test]
    fn test_named_action_overrides_method_table() {
        // A POST that performs a destroy needs the delete permission.
        let policy = HandlerPolicy::new()
            .governs(GovernedModel::TeacherProfile)
            .action(Method::POST, HandlerAction::Destroy);
        assert_eq!(
            required_codename(&policy, &Method::POST).as_deref(),
            Some("delete_teacherprofile")
        );
    }

    #[test]
    fn test_falls_back_to_method_table() {
        let policy = HandlerPolicy::new().governs(GovernedModel::User);
        assert_eq!(
            required_codename(&policy, &Method::PATCH).as_deref(),
            Some("change_user")
        );
        assert_eq!(
            required_codename(&policy, &Method::DELETE).as_deref(),
            Some("delete_user")
        );
    }

    #[test]
    fn test_unresolved_action_denies() {
        let policy = HandlerPolicy::new().governs(GovernedModel::Group);
        assert_eq!(required_codename(&policy, &Method::TRACE), None);
        let all = granted(&all_codenames().iter().map(String::as_str).collect::<Vec<_>>());
        assert!(!has_group_permission(
            false,
            required_codename(&policy, &Method::TRACE).as_deref(),
            &all
        ));
    }

    #[test]
    fn test_missing_model_denies_every_method() {
        let policy = HandlerPolicy::new()
            .action(Method::GET, HandlerAction::List)
            .action(Method::POST, HandlerAction::Create);
        let all_codes = all_codenames();
        let all = granted(&all_codes.iter().map(String::as_str).collect::<Vec<_>>());

        for method in [
            Method::GET,
            Method::HEAD,
            Method::OPTIONS,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ] {
            let required = required_codename(&policy, &method);
            assert!(required.is_none());
            assert!(!has_group_permission(false, required.as_deref(), &all));
        }
    }

    #[test]
    fn test_superuser_always_allowed() {
        let empty = HashSet::new();
        assert!(has_group_permission(true, None, &empty));
        assert!(has_group_permission(true, Some("delete_user"), &empty));
    }

    #[test]
    fn test_view_grant_allows_list_but_not_create() {
        let policy = student_profile_policy();
        let perms = granted(&["view_studentprofile"]);

        let list = required_codename(&policy, &Method::GET);
        let create = required_codename(&policy, &Method::POST);

        assert!(has_group_permission(false, list.as_deref(), &perms));
        assert!(!has_group_permission(false, create.as_deref(), &perms));
    }

    #[test]
    fn test_action_redeclaration_replaces() {
        let policy = HandlerPolicy::new()
            .governs(GovernedModel::User)
            .action(Method::PUT, HandlerAction::Update)
            .action(Method::PUT, HandlerAction::Destroy);
        assert_eq!(policy.named_action(&Method::PUT), Some(HandlerAction::Destroy));
    }

    #[test]
    fn test_all_codenames_matrix() {
        let codes = all_codenames();
        assert_eq!(codes.len(), 16);
        assert!(codes.contains(&"view_studentprofile".to_string()));
        assert!(codes.contains(&"delete_group".to_string()));
        let unique: HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }
}
