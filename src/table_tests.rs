// src/table_tests.rs
#[cfg(test)]
mod tests {
    use crate::{Table, TableError};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Account {
        owner: String,
        balance: i64,
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = Table::<u32, Account>::new();

        let stored = table.insert(
            1,
            Account {
                owner: "alice".to_string(),
                balance: 10,
            },
        );
        stored.balance += 5;

        assert_eq!(table.get(&1).owner, "alice");
        assert_eq!(table.get(&1).balance, 15);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_default() {
        let mut table = Table::<u32, Account>::new();
        let account = table.insert_default(3);
        assert_eq!(account, &mut Account::default());

        account.owner = "bob".to_string();
        assert_eq!(table.get(&3).owner, "bob");
    }

    #[test]
    fn test_addresses_survive_other_inserts_and_removes() {
        let mut table = Table::<u32, Account>::new();
        let first = table.insert_default(0) as *const Account;

        // Enough rows to force the underlying map to grow several times.
        for key in 1..1000 {
            table.insert_default(key);
        }
        for key in (1..1000).step_by(2) {
            table.remove(&key);
        }

        assert!(std::ptr::eq(table.get(&0), first));
    }

    #[test]
    fn test_remove() {
        let mut table = Table::<&'static str, i32>::new();
        table.insert("a", 1);

        assert_eq!(table.remove(&"a"), Some(1));
        assert!(!table.contains_key(&"a"));
        assert_eq!(table.remove(&"a"), None); // Already removed
        assert!(table.is_empty());

        // The key can be reused once removed.
        table.insert("a", 2);
        assert_eq!(*table.get(&"a"), 2);
    }

    #[test]
    fn test_try_insert_keeps_existing_row() {
        let mut table = Table::<u32, i32>::new();
        table.insert(1, 100);

        match table.try_insert(1, 200) {
            Err(TableError::DuplicateKey { key, value_type }) => {
                assert_eq!(key, "1");
                assert_eq!(value_type, "i32");
            }
            _ => panic!("Should have gotten duplicate key error"),
        }
        assert_eq!(*table.get(&1), 100);
    }

    #[test]
    fn test_try_get() {
        let mut table = Table::<u32, i32>::new();
        table.insert(1, 100);

        assert_eq!(table.try_get(&1), Ok(&100));
        assert_eq!(
            table.try_get(&2),
            Err(TableError::KeyNotFound {
                key: "2".to_string(),
                value_type: "i32",
            })
        );

        *table.try_get_mut(&1).unwrap() += 1;
        assert_eq!(*table.get(&1), 101);
        assert!(table.try_get_mut(&2).is_err());
    }

    #[test]
    #[should_panic(expected = "duplicate key 5 in i32 table")]
    fn test_duplicate_insert_panics() {
        let mut table = Table::<u32, i32>::new();
        table.insert(5, 1);
        table.insert(5, 2);
    }

    #[test]
    #[should_panic(expected = "key \"missing\" not found")]
    fn test_missing_get_panics() {
        let table = Table::<String, i32>::new();
        table.get(&"missing".to_string());
    }

    #[test]
    #[should_panic(expected = "key 9 not found in i32 table")]
    fn test_missing_get_mut_panics() {
        let mut table = Table::<u32, i32>::new();
        *table.get_mut(&9) = 1;
    }

    #[test]
    fn test_scan_visits_each_row_once() {
        let mut table = Table::<u32, u64>::with_capacity(8);
        assert!(table.capacity() >= 8);
        for key in 0..8 {
            table.insert(key, u64::from(key) * 2);
        }

        let mut seen = Vec::new();
        table.scan(|key, value| {
            assert_eq!(*value, u64::from(*key) * 2);
            seen.push(*key);
        });
        seen.sort();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_scan_mut() {
        let mut table = Table::<u32, Account>::new();
        table.insert(
            1,
            Account {
                owner: "alice".to_string(),
                balance: 10,
            },
        );
        table.insert(
            2,
            Account {
                owner: "bob".to_string(),
                balance: 20,
            },
        );

        table.scan_mut(|_, account| account.balance *= 10);

        assert_eq!(table.get(&1).balance, 100);
        assert_eq!(table.get(&2).balance, 200);
    }

    #[test]
    fn test_scan_empty_table() {
        let table = Table::<u32, Account>::default();
        let mut calls = 0;
        table.scan(|_, _| calls += 1);
        assert_eq!(calls, 0);
        assert_eq!(
            format!("{:?}", table),
            format!(
                "Table {{ value_type: {:?}, rows: 0 }}",
                std::any::type_name::<Account>()
            )
        );
    }
}
