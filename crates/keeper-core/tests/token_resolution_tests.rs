use keeper_core::{HostAssignment, InventoryLayout, KeeperError, NodeTarget, RenameTarget};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,15}".prop_filter("dot names are reserved", |s| s != "." && s != "..")
}

proptest! {
    #[test]
    fn parsers_never_panic(token in ".{0,40}") {
        let _ = NodeTarget::parse(&token);
        let _ = RenameTarget::parse(&token);
        let _ = HostAssignment::parse(&token);
    }

    #[test]
    fn parse_errors_are_always_syntax_errors(token in ".{0,40}") {
        if let Err(err) = NodeTarget::parse(&token) {
            prop_assert!(matches!(err, KeeperError::Syntax { .. }), "expected Syntax error, got {:?}", err);
        }
        if let Err(err) = HostAssignment::parse(&token) {
            prop_assert!(matches!(err, KeeperError::Syntax { .. }), "expected Syntax error, got {:?}", err);
        }
    }

    #[test]
    fn member_marker_sits_under_group_path(group in name(), host in name()) {
        prop_assume!(group != "hosts");
        let layout = InventoryLayout::new("/inventory");
        let token = format!("{}:{}", group, host);
        let nodes = NodeTarget::parse(&token).unwrap().resolve(&layout);

        prop_assert_eq!(nodes.len(), 2);
        prop_assert_eq!(
            nodes[1].marker_path.clone(),
            Some(format!("{}/{}", nodes[0].path, host))
        );
        prop_assert_eq!(&nodes[1].path, &layout.host_path(&host));
    }

    #[test]
    fn assignment_keeps_last_value_per_key(
        group in name(),
        host in name(),
        pairs in proptest::collection::vec((name(), "[a-zA-Z0-9:./-]{0,12}"), 0..8),
    ) {
        prop_assume!(group != "hosts");
        let mut token = format!("{}:{}", group, host);
        for (k, v) in &pairs {
            token.push_str(&format!(",{}:{}", k, v));
        }

        let parsed = HostAssignment::parse(&token).unwrap();
        for (k, _) in &pairs {
            let last = pairs.iter().rev().find(|(key, _)| key == k).map(|(_, v)| v);
            prop_assert_eq!(parsed.vars.get(k), last);
        }
    }
}

#[test]
fn test_display_round_trips_targets() {
    for token in ["hosts:web01", "web", "web:web01"] {
        let target = NodeTarget::parse(token).unwrap();
        assert_eq!(target.to_string(), token);
    }
}
