use get_build_number::assigner::{assign, Assignment, ShortCircuitReason};
use get_build_number::domain::{parse_branch, BranchKey, BuildCounters, DecisionContext};

#[test]
fn test_recognized_branches_parse_to_their_prefixes() {
    let cases = [
        ("0Afoo-bar", "0", "A"),
        ("0A", "0", "A"),
        ("1B-hotfix", "1", "B"),
        ("42XYZ_anything at all", "42", "XYZ"),
        ("007Q7", "007", "Q"),
    ];

    for (branch, buildtrain, minor) in cases {
        assert_eq!(
            parse_branch(branch),
            Some(BranchKey::new(buildtrain, minor)),
            "branch {}",
            branch
        );
    }
}

#[test]
fn test_unrecognized_branches() {
    for branch in ["main", "123", "ABC", "experimental", "-0A", "a0A", ""] {
        assert_eq!(parse_branch(branch), None, "branch {:?}", branch);
    }
}

#[test]
fn test_pull_request_ignores_branch_and_store() {
    let stores = [
        BuildCounters::new(),
        BuildCounters::from([("0A", 5)]),
        BuildCounters::from([("garbage", 1)]),
    ];
    let branches = ["0Afeature", "trunk", ""];

    for store in &stores {
        for branch in branches {
            for default in [false, true] {
                let mut ctx = DecisionContext::new(branch, "23456789").for_pull_request();
                ctx.is_default_branch = default;

                let assignment = assign(&ctx, store.clone()).unwrap();
                assert_eq!(
                    assignment,
                    Assignment::ShortCircuit {
                        reason: ShortCircuitReason::PullRequest,
                        output: "23456789".to_string(),
                    }
                );
            }
        }
    }
}

#[test]
fn test_non_default_unrecognized_branch_returns_change_id() {
    let ctx = DecisionContext::new("feature/login", "23456789");
    let assignment = assign(&ctx, BuildCounters::from([("0A", 5)])).unwrap();
    assert_eq!(assignment.output(), "23456789");
    assert_eq!(assignment.updated_counters(), None);
}

#[test]
fn test_other_keys_are_untouched() {
    let ctx = DecisionContext::new("1Cwork", "23456789");
    let assignment = assign(&ctx, BuildCounters::from([("0A", 6), ("0B", 2)])).unwrap();
    assert_eq!(assignment.output(), "1C1");
    assert_eq!(
        assignment.updated_counters(),
        Some(&BuildCounters::from([("0A", 6), ("0B", 2), ("1C", 1)]))
    );
}

#[test]
fn test_consecutive_runs_count_up() {
    let ctx = DecisionContext::new("0Afeature", "23456789");
    let mut counters = BuildCounters::new();
    let mut outputs = Vec::new();

    for _ in 0..3 {
        let assignment = assign(&ctx, counters.clone()).unwrap();
        outputs.push(assignment.output());
        counters = assignment.updated_counters().cloned().unwrap();
        // Each run persists and reloads through the codec
        counters = BuildCounters::decode(&counters.encode().unwrap()).unwrap();
    }

    assert_eq!(outputs, vec!["0A1", "0A2", "0A3"]);
}
