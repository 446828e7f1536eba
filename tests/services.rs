//! End-to-end checks through the public API.

use vault_index::algorithms::search::{binary_search, exponential_search, jump_search, linear_search};
use vault_index::algorithms::sort::{merge_sort_by_key, quick_sort};
use vault_index::collections::{PriorityScheduler, RelationshipGraph};
use vault_index::services::{AccountQuery, RegistrationRequest, UserCriteria};
use vault_index::types::money::units;
use vault_index::types::{AccountType, Role, TransactionKind};
use vault_index::{Bank, BankConfig, BankError, KeyedIndex};

fn open(bank: &mut Bank, customer: &str, balance: u64) -> String {
    bank.create_account(customer, AccountType::Checking, balance)
        .unwrap()
        .account_number
        .clone()
}

// ============================================================================
// Index kernel
// ============================================================================

#[test]
fn test_avl_balanced_after_every_insert() {
    let mut index = KeyedIndex::new();
    for key in 0..512u32 {
        index.insert(key, ());
        assert!(index.validate(), "unbalanced after inserting {key}");
    }
    let keys: Vec<u32> = index.keys().into_iter().copied().collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    assert!(index.height() <= 10);
}

#[test]
fn test_reinsert_keeps_one_entry() {
    let mut bank = Bank::default();
    let number = open(&mut bank, "c1", units(10));
    bank.deposit(&number, units(5)).unwrap();

    let registry = bank.accounts().account_registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.tree().len(), 1);
    assert_eq!(registry.cache().len(), 1);
    assert_eq!(registry.find_cached(number.as_str()).unwrap().balance, units(15));
    assert_eq!(registry.find_indexed(number.as_str()).unwrap().balance, units(15));
}

#[test]
fn test_cache_and_tree_agree_for_service_entities() {
    let mut bank = Bank::default();
    let numbers: Vec<String> = (0..40).map(|i| open(&mut bank, &format!("c{i}"), units(1))).collect();
    bank.register("alice", "Secr3t!@", "a@x.com").unwrap();

    let accounts = bank.accounts().account_registry();
    for number in &numbers {
        assert!(accounts.indexes_agree(number.as_str()));
    }
    assert!(accounts.indexes_agree("nope"));
    assert!(bank.auth().user_registry().indexes_agree("alice"));
}

#[test]
fn test_dijkstra_example() {
    let mut graph = RelationshipGraph::new();
    graph.add_edge("A", "B", 5);
    graph.add_edge("B", "C", 3);
    graph.add_edge("A", "C", 10);

    let paths = graph.dijkstra(&"A");
    assert_eq!(paths.distance(&"A"), Some(0));
    assert_eq!(paths.distance(&"B"), Some(5));
    assert_eq!(paths.distance(&"C"), Some(8));
}

#[test]
fn test_priority_fifo_example() {
    let mut scheduler = PriorityScheduler::new();
    scheduler.push("X", 5u64);
    scheduler.push("Y", 5);
    scheduler.push("Z", 9);
    assert_eq!(scheduler.drain_ordered(), vec!["Z", "X", "Y"]);
}

#[test]
fn test_sorts_and_searches_agree() {
    let mut values = vec![42u32, 7, 19, 7, 88, 1, 63, 19, 5];
    quick_sort(&mut values);
    assert_eq!(values, vec![1, 5, 7, 7, 19, 19, 42, 63, 88]);

    for target in 0..100u32 {
        let exists = linear_search(&values, &target).is_some();
        assert_eq!(binary_search(&values, &target).is_some(), exists);
        assert_eq!(jump_search(&values, &target).is_some(), exists);
        assert_eq!(exponential_search(&values, &target).is_some(), exists);
    }

    let mut rows = vec![("b", 2), ("a", 1), ("c", 2), ("d", 1)];
    merge_sort_by_key(&mut rows, |r| r.1);
    assert_eq!(rows, vec![("a", 1), ("d", 1), ("b", 2), ("c", 2)]);
}

// ============================================================================
// Services
// ============================================================================

#[test]
fn test_auth_round_trip() {
    let mut bank = Bank::default();
    let user_id = bank
        .register("alice", "Secr3t!@", "a@x.com")
        .unwrap()
        .user_id
        .clone();

    assert_eq!(bank.authenticate("alice", "Secr3t!@").unwrap().user_id, user_id);
    assert_eq!(
        bank.authenticate("alice", "wrong").unwrap_err(),
        BankError::InvalidCredentials
    );
    assert_eq!(
        bank.authenticate("nobody", "Secr3t!@").unwrap_err(),
        BankError::InvalidCredentials
    );
}

#[test]
fn test_registration_duplicates_and_validation() {
    let mut bank = Bank::default();
    bank.register("alice", "Secr3t!@", "a@x.com").unwrap();

    assert!(matches!(
        bank.register("ALICE", "Secr3t!@", "other@x.com"),
        Err(BankError::UsernameTaken(_))
    ));
    assert!(matches!(
        bank.register("alice2", "Secr3t!@", "A@X.com"),
        Err(BankError::AlreadyExists { entity: "email", .. })
    ));

    let weak = RegistrationRequest::new("bob", "short", "not-an-email").confirm("different");
    match bank.register_with(weak) {
        Err(BankError::ValidationFailed(errors)) => {
            assert!(errors.get("password").is_some());
            assert!(errors.get("email").is_some());
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    let criteria = UserCriteria { role: Some(Role::Customer), ..Default::default() };
    assert_eq!(bank.registration().users_matching(&criteria).len(), 1);
}

#[test]
fn test_transfer_conservation() {
    let mut bank = Bank::default();
    let a = open(&mut bank, "c1", units(100));
    let b = open(&mut bank, "c2", 0);

    bank.transfer(&a, &b, units(40)).unwrap();

    assert_eq!(bank.find_account(&a).unwrap().balance, units(60));
    assert_eq!(bank.find_account(&b).unwrap().balance, units(40));
    assert_eq!(
        bank.transactions().network().total_weight(&a, &b),
        units(40)
    );
    assert_eq!(bank.shortest_paths_from(&a).distance(&b), Some(units(40)));
}

#[test]
fn test_overdraft_honoured() {
    let mut bank = Bank::new(BankConfig::new().default_overdraft(units(50)));
    let a = open(&mut bank, "c1", units(10));
    let b = open(&mut bank, "c2", 0);

    bank.transfer(&a, &b, units(60)).unwrap();
    assert!(matches!(
        bank.transfer(&a, &b, units(1)),
        Err(BankError::InsufficientFunds { .. })
    ));
    assert_eq!(bank.find_account(&b).unwrap().balance, units(60));
}

#[test]
fn test_review_queue_orders_by_urgency() {
    let mut bank = Bank::default();
    let a = open(&mut bank, "c1", units(100_000));
    let b = open(&mut bank, "c2", 0);

    let first = bank.transfer(&a, &b, units(100)).unwrap();
    let intl = bank
        .transfer_with_kind(&a, &b, units(100), TransactionKind::International)
        .unwrap();
    let second = bank.transfer(&a, &b, units(100)).unwrap();

    assert_eq!(bank.next_for_review().unwrap(), intl);
    assert_eq!(bank.next_for_review().unwrap(), first);
    assert_eq!(bank.next_for_review().unwrap(), second);
    assert!(bank.next_for_review().is_err());
}

#[test]
fn test_customer_accounts_by_balance() {
    let mut bank = Bank::default();
    let customer = bank
        .add_customer("Jane", "Doe", "jane@example.com")
        .unwrap()
        .customer_id
        .clone();
    for balance in [units(300), units(100), units(200)] {
        open(&mut bank, &customer, balance);
    }

    let balances: Vec<u64> = bank
        .accounts_for_customer(&customer)
        .iter()
        .map(|a| a.balance)
        .collect();
    assert_eq!(balances, vec![units(100), units(200), units(300)]);
    assert_eq!(bank.find_customer(&customer).unwrap().accounts.len(), 3);
    assert_eq!(
        bank.accounts()
            .search(&AccountQuery::CustomerId(customer.clone()))
            .len(),
        3
    );
}

#[test]
fn test_customer_network_follows_transfers() {
    let mut bank = Bank::default();
    let a = open(&mut bank, "alpha", units(100));
    let b = open(&mut bank, "beta", units(100));
    let c = open(&mut bank, "gamma", units(100));

    bank.transfer(&a, &b, units(10)).unwrap();
    bank.transfer(&b, &c, units(5)).unwrap();

    let analysis = bank.analyze_customer_network("alpha");
    assert_eq!(analysis.connected, vec!["alpha", "beta", "gamma"]);
    assert_eq!(analysis.distances.distance(&"gamma".to_string()), Some(units(15)));
}
