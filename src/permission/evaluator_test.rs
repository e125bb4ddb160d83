// ABOUTME: Tests for Permission - roles, rule definition and the can/has engine.
// ABOUTME: Covers direct callables, method rules and result interpretation.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};

use super::*;
use crate::class::PermissionClass;
use crate::context::AppContext;
use crate::error::PermissionError;
use crate::rule::{MethodRef, Outcome, ResolverRef};

/// Resolver type whose constructor bumps a counter from the app context.
struct Reports {
    owner: String,
}

impl PermissionClass for Reports {
    const TYPE_ID: &'static str = "Reports";
    const METHODS: &'static [&'static str] = &["report", "archive"];

    fn construct(app: &AppContext) -> Self {
        if let Some(counter) = app.get::<Arc<AtomicUsize>>() {
            counter.fetch_add(1, Ordering::SeqCst);
        }
        Self {
            owner: "auditor".to_string(),
        }
    }

    fn invoke(&self, method: &str, role: &str, args: &[Value]) -> Option<Outcome> {
        match method {
            "report" => {
                let mut actions = vec!["read"];
                if role == self.owner {
                    actions.push("export");
                }
                Some(actions.into())
            }
            "archive" => Some(args.first().cloned().unwrap_or(Value::Null).into()),
            _ => None,
        }
    }
}

#[test]
fn test_set_current_role() {
    let mut permission = Permission::new("admin", AppContext::empty());
    assert_eq!(permission.current_role(), "admin");

    permission.set_current_role("user");
    assert_eq!(permission.current_role(), "user");
}

#[test]
fn test_is() {
    let permission = Permission::new("admin", AppContext::empty());
    assert!(permission.is("admin"));
    assert!(!permission.is("user"));
    assert!(!permission.is("Admin"));
    assert!(!permission.is(""));
}

#[test]
fn test_define_rule_visible_in_rules() {
    let mut permission = Permission::new("admin", AppContext::empty());
    let method: MethodRef = "Some_Permissions_Class->createOrder".parse().unwrap();
    permission.define_rule("createOrder", method, false).unwrap();

    let rules = permission.rules();
    assert_eq!(rules.len(), 1);
    assert_eq!(
        rules["createOrder"],
        ResolverRef::method("Some_Permissions_Class", "createOrder")
    );
}

#[test]
fn test_define_duplicate_rule() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("createOrder", ResolverRef::method("Orders", "createOrder"), false)
        .unwrap();

    let err = permission
        .define_rule("createOrder", ResolverRef::method("Orders", "createOrder"), false)
        .unwrap_err();
    assert_eq!(err.to_string(), "Rule already defined: createOrder");
}

#[test]
fn test_define_rule_overwrite() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("smell", ResolverRef::direct(|_, _| false), false)
        .unwrap();
    permission
        .define_rule("smell", ResolverRef::direct(|_, _| true), true)
        .unwrap();

    assert!(permission.can("smell", &[]).unwrap());
}

#[test]
fn test_can_undefined_permission() {
    let mut permission = Permission::new("admin", AppContext::empty());

    let err = permission.can("smell", &[]).unwrap_err();
    assert!(matches!(err, PermissionError::UndefinedPermission(ref n) if n == "smell"));
    assert_eq!(err.to_string(), "Permission not defined: smell");

    // The action suffix is not part of the reported name.
    let err = permission.can("smell.strong", &[]).unwrap_err();
    assert_eq!(err.to_string(), "Permission not defined: smell");
}

#[test]
fn test_can_with_callable() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule(
            "canSmell",
            ResolverRef::direct(|role, _| role == "admin"),
            false,
        )
        .unwrap();

    assert!(permission.can("canSmell", &[]).unwrap());

    permission.set_current_role("user");
    assert!(!permission.can("canSmell", &[]).unwrap());
}

#[test]
fn test_boolean_result_ignores_action() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("yes", ResolverRef::direct(|_, _| true), false)
        .unwrap();
    permission
        .define_rule("no", ResolverRef::direct(|_, _| false), false)
        .unwrap();

    assert!(permission.can("yes", &[]).unwrap());
    assert!(permission.can("yes.anything", &[]).unwrap());
    assert!(!permission.can("no", &[]).unwrap());
    assert!(!permission.can("no.anything", &[]).unwrap());
}

#[test]
fn test_action_list_result() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("doc", ResolverRef::direct(|_, _| vec!["a", "b"]), false)
        .unwrap();

    assert!(permission.can("doc.a", &[]).unwrap());
    assert!(permission.can("doc.b", &[]).unwrap());
    assert!(!permission.can("doc.c", &[]).unwrap());
    assert!(!permission.can("doc", &[]).unwrap());
    assert!(!permission.can("doc.", &[]).unwrap());
}

#[test]
fn test_action_splits_on_first_dot() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("doc", ResolverRef::direct(|_, _| vec!["a.b"]), false)
        .unwrap();

    assert!(permission.can("doc.a.b", &[]).unwrap());
    assert!(!permission.can("doc.a", &[]).unwrap());
}

#[test]
fn test_unsupported_result_denies() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("odd", ResolverRef::direct(|_, _| json!("yes")), false)
        .unwrap();

    assert!(!permission.can("odd", &[]).unwrap());
    assert!(!permission.can("odd.yes", &[]).unwrap());
}

#[test]
fn test_args_forwarded_verbatim() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut permission = Permission::new("editor", AppContext::empty());
    permission
        .define_rule(
            "post",
            ResolverRef::direct(move |role, args| {
                sink.lock().unwrap().push((role.to_string(), args.to_vec()));
                true
            }),
            false,
        )
        .unwrap();

    permission
        .can("post.edit", &[json!(7), json!({"draft": true})])
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![(
            "editor".to_string(),
            vec![json!(7), json!({"draft": true})]
        )]
    );
}

#[test]
fn test_has_is_alias() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("doc", ResolverRef::direct(|_, _| vec!["read"]), false)
        .unwrap();

    assert_eq!(
        permission.has("doc.read", &[]).unwrap(),
        permission.can("doc.read", &[]).unwrap()
    );
    assert!(!permission.has("doc.write", &[]).unwrap());
    assert!(permission.has("missing", &[]).is_err());
}

#[test]
fn test_method_rule_uses_current_role() {
    let mut permission = Permission::builder()
        .role("viewer")
        .class::<Reports>()
        .build();
    permission
        .define_rule("report", ResolverRef::method("Reports", "report"), false)
        .unwrap();

    assert!(permission.can("report.read", &[]).unwrap());
    assert!(!permission.can("report.export", &[]).unwrap());

    permission.set_current_role("auditor");
    assert!(permission.can("report.export", &[]).unwrap());
}

#[test]
fn test_method_rule_json_outcome() {
    let mut permission = Permission::builder().class::<Reports>().build();
    permission
        .define_rule("archive", ResolverRef::method("Reports", "archive"), false)
        .unwrap();

    assert!(permission.can("archive", &[json!(true)]).unwrap());
    assert!(!permission.can("archive", &[json!(false)]).unwrap());
    assert!(permission.can("archive.old", &[json!(["old"])]).unwrap());
    assert!(!permission.can("archive", &[]).unwrap());
}

#[test]
fn test_instances_constructed_once_with_app_context() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut permission = Permission::builder()
        .app(AppContext::new(Arc::clone(&counter)))
        .class::<Reports>()
        .build();
    permission
        .define_rule("report", ResolverRef::method("Reports", "report"), false)
        .unwrap();
    permission
        .define_rule("archive", ResolverRef::method("Reports", "archive"), false)
        .unwrap();

    // Nothing is built until a method rule is checked.
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    permission.can("report.read", &[]).unwrap();
    permission.can("report.read", &[]).unwrap();
    permission.can("archive", &[json!(true)]).unwrap();
    permission.set_current_role("auditor");
    permission.can("report.export", &[]).unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_method_rule_unknown_type() {
    let mut permission = Permission::new("admin", AppContext::empty());
    permission
        .define_rule("createOrder", ResolverRef::method("Nowhere", "createOrder"), false)
        .unwrap();

    let err = permission.can("createOrder", &[]).unwrap_err();
    assert!(matches!(err, PermissionError::Reflection(ref t) if t == "Nowhere"));
}

#[test]
fn test_method_rule_unknown_method() {
    let mut permission = Permission::builder().class::<Reports>().build();
    permission
        .define_rule("shred", ResolverRef::method("Reports", "shred"), false)
        .unwrap();

    let err = permission.can("shred", &[]).unwrap_err();
    assert!(matches!(
        err,
        PermissionError::UndefinedMethod { ref type_id, ref method }
            if type_id == "Reports" && method == "shred"
    ));
}

#[test]
fn test_split_query() {
    assert_eq!(split_query("order"), ("order", ""));
    assert_eq!(split_query("order.create"), ("order", "create"));
    assert_eq!(split_query("order.a.b"), ("order", "a.b"));
    assert_eq!(split_query(".create"), ("", "create"));
}

#[test]
fn test_config_defaults_and_deserialize() {
    let config = PermissionConfig::default();
    assert_eq!(config.snapshot_mode, SnapshotMode::Replace);
    assert_eq!(config.cache_key("Orders"), "flight_permissions_class_methods_Orders");
    assert!(config.is_reserved("__construct"));
    assert!(!config.is_reserved("_private"));

    let config: PermissionConfig =
        serde_json::from_value(json!({"snapshot_mode": "merge", "reserved_prefix": ""})).unwrap();
    assert_eq!(config.snapshot_mode, SnapshotMode::Merge);
    assert_eq!(config.cache_key_prefix, DEFAULT_CACHE_KEY_PREFIX);
    assert!(!config.is_reserved("__construct"));
}
