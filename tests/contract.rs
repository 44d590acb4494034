// Both containers behind the shared `Dictionary` bound: the same
// scenario must behave identically whichever backing structure runs it.

use treetable::{Dictionary, KeyNotFound, ProbeMap, TreeMap};

fn exercise<D: Dictionary<String, i32>>(map: &mut D) {
    assert!(map.is_empty());
    assert_eq!(map.try_get(&"a".to_string()), Err(KeyNotFound));

    assert_eq!(map.insert("a".to_string(), 1), None);
    assert_eq!(map.insert("b".to_string(), 2), None);
    assert_eq!(map.insert("a".to_string(), 10), Some(1));
    assert_eq!(map.len(), 2);

    assert_eq!(map.get(&"a".to_string()), Some(&10));
    assert!(map.contains_key(&"b".to_string()));
    assert!(!map.contains_key(&"c".to_string()));
    assert_eq!(map.try_get(&"b".to_string()), Ok(&2));

    if let Some(v) = map.get_mut(&"b".to_string()) {
        *v += 100;
    }
    assert_eq!(map.get(&"b".to_string()), Some(&102));

    // Removing an absent key is a no-op, not an error.
    assert_eq!(map.remove(&"zzz".to_string()), None);
    assert_eq!(map.len(), 2);

    assert_eq!(map.remove(&"a".to_string()), Some(10));
    assert_eq!(map.get(&"a".to_string()), None);
    assert_eq!(map.len(), 1);

    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.get(&"b".to_string()), None);

    // The structure is reusable after clear.
    assert_eq!(map.insert("fresh".to_string(), 0), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn tree_map_satisfies_the_contract() {
    let mut map: TreeMap<String, i32> = TreeMap::new();
    exercise(&mut map);
}

#[test]
fn probe_map_satisfies_the_contract() {
    let mut map: ProbeMap<String, i32> = ProbeMap::new();
    exercise(&mut map);
}

#[test]
fn generic_client_code_over_either_map() {
    fn count_up<D: Dictionary<String, i32>>(map: &mut D, words: &[&str]) {
        for w in words {
            let n = map.get(&w.to_string()).copied().unwrap_or(0);
            map.insert(w.to_string(), n + 1);
        }
    }

    let words = ["to", "be", "or", "not", "to", "be"];
    let mut tree: TreeMap<String, i32> = TreeMap::new();
    let mut probe: ProbeMap<String, i32> = ProbeMap::new();
    count_up(&mut tree, &words);
    count_up(&mut probe, &words);

    for w in ["to", "be", "or", "not"] {
        assert_eq!(
            Dictionary::get(&tree, &w.to_string()),
            Dictionary::get(&probe, &w.to_string())
        );
    }
    assert_eq!(Dictionary::get(&tree, &"to".to_string()), Some(&2));
    assert_eq!(Dictionary::len(&tree), 4);
    assert_eq!(Dictionary::len(&probe), 4);
}
