// Black-box tests for TreeMap through the public API only.

use treetable::TreeMap;

#[test]
fn basic_insert_remove() {
    let mut map = TreeMap::new();
    map.insert(0, 0);
    map.insert(1, 3);
    map.insert(2, 7);
    assert_eq!(map.len(), 3);
    assert_eq!(map.remove(&1), Some(3));
    let entries: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(entries, vec![(0, 0), (2, 7)]);
}

#[test]
fn string_keys_iterate_in_order() {
    let mut map = TreeMap::new();
    map.insert("test1".to_string(), 0);
    map.insert("test2".to_string(), 3);
    map.insert("test3".to_string(), 7);

    let mut forward = String::new();
    for (k, v) in &map {
        forward.push_str(k);
        forward.push_str(&v.to_string());
        forward.push(';');
    }
    assert_eq!(forward, "test10;test23;test37;");

    let mut backward = String::new();
    let mut c = map.cursor_rev();
    while let Some((k, v)) = c.entry(&map) {
        backward.push_str(k);
        backward.push_str(&v.to_string());
        backward.push(';');
        c.advance(&map);
    }
    assert_eq!(backward, "test37;test23;test10;");
}

#[test]
fn remove_at_walks_the_survivors() {
    let mut map: TreeMap<i32, i32> = (0..4).map(|k| (k, k * 10)).collect();

    // Remove by key, then through cursors at several positions.
    assert_eq!(map.remove(&2), Some(20));

    let mut second = map.cursor();
    second.advance(&map);
    map.remove_at(&mut second); // key 1
    assert_eq!(second.key(&map), Some(&3));

    let mut begin = map.cursor();
    map.remove_at(&mut begin); // key 0
    assert_eq!(begin.key(&map), Some(&3));

    let mut last = map.last();
    map.remove_at(&mut last); // key 3, the only one left
    assert!(last.is_end());
    assert!(map.is_empty());

    // remove_at on an empty map is a no-op.
    let mut end = map.cursor();
    map.remove_at(&mut end);
    assert!(map.is_empty());
}

#[test]
fn min_max_and_find() {
    let map: TreeMap<i32, &str> = [(4, "four"), (1, "one"), (9, "nine"), (6, "six")]
        .into_iter()
        .collect();
    assert_eq!(map.first().entry(&map), Some((&1, &"one")));
    assert_eq!(map.last().entry(&map), Some((&9, &"nine")));
    assert_eq!(map.find(&6).value(&map), Some(&"six"));
    assert!(map.find(&5).is_end());
}

#[test]
fn swap_values_between_cursors() {
    let mut map: TreeMap<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let a = map.find(&"a");
    let c = map.find(&"c");
    map.swap_values(&a, &c);
    assert_eq!(map[&"a"], 3);
    assert_eq!(map[&"c"], 1);
    assert_eq!(map[&"b"], 2);

    // Keys and order are untouched.
    let keys: Vec<&str> = map.keys().copied().collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn indexed_write_through_get_or_default() {
    let mut map: TreeMap<String, i32> = TreeMap::new();
    *map.get_or_default("counter".to_string()) += 1;
    *map.get_or_default("counter".to_string()) += 1;
    assert_eq!(map["counter"], 2);
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_read_of_absent_key_panics() {
    let map: TreeMap<String, i32> = TreeMap::new();
    let _ = map["missing"];
}

#[test]
fn clear_then_reuse() {
    let mut map: TreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    map.clear();
    assert!(map.is_empty());
    assert!(map.first().is_end());
    map.insert(7, 7);
    assert_eq!(map.iter().count(), 1);
}

#[test]
fn mutable_iteration_both_directions() {
    let mut map: TreeMap<i32, i32> = (0..5).map(|k| (k, 0)).collect();
    for (i, (_, v)) in map.iter_mut().enumerate() {
        *v = i as i32;
    }
    // Reverse mutable iteration sees the same entries, descending.
    let seen: Vec<(i32, i32)> = map.iter_mut_rev().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(seen, vec![(4, 4), (3, 3), (2, 2), (1, 1), (0, 0)]);
}

#[test]
fn clone_is_independent() {
    let mut a: TreeMap<i32, i32> = (0..8).map(|k| (k, k)).collect();
    let b = a.clone();
    a.remove(&3);
    a.insert(100, 100);
    assert_eq!(b.len(), 8);
    assert!(b.contains_key(&3));
    assert!(!b.contains_key(&100));
}

#[test]
fn degenerate_insertion_order_still_works() {
    // Ascending insertion produces a right-spine tree; operations must
    // stay correct even at worst-case depth.
    let mut map = TreeMap::new();
    for k in 0..500 {
        map.insert(k, k);
    }
    assert_eq!(map.len(), 500);
    assert_eq!(map.first().key(&map), Some(&0));
    assert_eq!(map.last().key(&map), Some(&499));
    for k in (0..500).step_by(7) {
        assert_eq!(map.remove(&k), Some(k));
    }
    let keys: Vec<i32> = map.keys().copied().collect();
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
    drop(map); // deep trees must drop without recursion
}
