use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rbtree_set::compare::Natural;
use rbtree_set::red_black_tree::RedBlackSet;
use simplelog::{Config, LevelFilter, TestLogger};
use std::collections::BTreeSet;
use std::mem;
use std::ptr;

const NUM_OF_OPERATIONS: usize = 2000;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

fn set_from<I>(elems: I) -> RedBlackSet<u32>
where
    I: IntoIterator<Item = u32>,
{
    let mut set = RedBlackSet::new();
    for elem in elems {
        set.insert(elem).unwrap();
    }
    set
}

fn morris_elems(set: &mut RedBlackSet<u32>) -> Vec<u32> {
    let mut ret = Vec::new();
    let mut iter = set.morris_iter();
    while iter.has_next() {
        ret.push(*iter.next().unwrap());
    }
    ret
}

#[test]
fn int_test_shuffled_insert() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(0xfff);
    let mut elems = (0..NUM_OF_OPERATIONS as u32).collect::<Vec<u32>>();
    elems.shuffle(&mut rng);

    let mut set = RedBlackSet::new();
    for elem in &elems {
        assert_eq!(set.insert(*elem).unwrap(), None);
        assert!(set.validate().is_ok());
    }

    assert_eq!(set.len(), NUM_OF_OPERATIONS);
    assert_eq!(
        set.iter().cloned().collect::<Vec<u32>>(),
        (0..NUM_OF_OPERATIONS as u32).collect::<Vec<u32>>(),
    );
    assert_eq!(
        morris_elems(&mut set),
        (0..NUM_OF_OPERATIONS as u32).collect::<Vec<u32>>(),
    );
    assert_eq!(set.get(&(NUM_OF_OPERATIONS as u32)), None);
}

#[test]
fn int_test_duplicates() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(1);
    let mut set = RedBlackSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS {
        let elem = rng.gen_range(0..3 * NUM_OF_OPERATIONS as u32);
        let len = set.len();
        match set.insert(elem).unwrap() {
            Some(existing) => {
                assert_eq!(*existing, elem);
                assert!(!expected.insert(elem));
                assert_eq!(set.len(), len);
            },
            None => {
                assert!(expected.insert(elem));
                assert_eq!(set.len(), len + 1);
            },
        }
    }

    assert!(set.validate().is_ok());
    for elem in &expected {
        assert_eq!(set.get(elem), Some(elem));
    }
    for _ in 0..NUM_OF_OPERATIONS {
        let elem = rng.gen_range(3 * NUM_OF_OPERATIONS as u32..u32::max_value());
        assert_eq!(set.get(&elem), None);
    }
    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_iterate_between_inserts() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2);
    let mut set = RedBlackSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..10 {
        for _ in 0..NUM_OF_OPERATIONS / 10 {
            let elem = rng.gen::<u32>();
            set.insert(elem).unwrap();
            expected.insert(elem);
        }

        let elems = morris_elems(&mut set);
        assert!(elems.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(elems.len(), set.len());
        assert!(elems.iter().all(|elem| set.contains(elem)));
        assert!(set.validate().is_ok());
    }

    assert_eq!(
        set.into_iter().collect::<Vec<u32>>(),
        expected.into_iter().collect::<Vec<u32>>(),
    );
}

#[test]
fn int_test_insert_remove() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(3);
    let mut set = RedBlackSet::new();
    let mut expected = BTreeSet::new();

    for _ in 0..NUM_OF_OPERATIONS * 5 {
        let elem = rng.gen_range(0..NUM_OF_OPERATIONS as u32);
        if rng.gen::<bool>() {
            assert_eq!(set.insert(elem).unwrap().is_none(), expected.insert(elem));
        } else {
            assert_eq!(set.remove(&elem), expected.take(&elem));
        }
        assert_eq!(set.len(), expected.len());
    }

    assert!(set.validate().is_ok());
    assert_eq!(set.min(), expected.iter().next());
    assert_eq!(set.max(), expected.iter().next_back());
    assert_eq!(
        set.iter().collect::<Vec<&u32>>(),
        expected.iter().collect::<Vec<&u32>>(),
    );
}

#[test]
fn int_test_even_odd_set_operations() {
    init_logger();
    let n = NUM_OF_OPERATIONS as u32;
    let evens = set_from((0..=n).map(|i| 2 * i));
    let odds = set_from((0..n).map(|i| 2 * i + 1));

    let union = RedBlackSet::union(&evens, &odds).unwrap();
    assert_eq!(union.len(), 2 * NUM_OF_OPERATIONS + 1);
    assert_eq!(
        union.iter().cloned().collect::<Vec<u32>>(),
        (0..=2 * n).collect::<Vec<u32>>(),
    );
    assert!(union.validate().is_ok());

    let intersection = RedBlackSet::intersection(&evens, &odds).unwrap();
    assert!(intersection.is_empty());

    let difference = RedBlackSet::difference(&union, &odds).unwrap();
    assert_eq!(difference, evens);
    assert!(difference.validate().is_ok());
}

#[test]
fn int_test_set_operation_properties() {
    init_logger();
    let mut rng = StdRng::seed_from_u64(4);
    let a = set_from((0..NUM_OF_OPERATIONS).map(|_| rng.gen_range(0..3000)));
    let b = set_from((0..NUM_OF_OPERATIONS / 2).map(|_| rng.gen_range(0..3000)));

    let union = RedBlackSet::union(&a, &b).unwrap();
    let intersection = RedBlackSet::intersection(&a, &b).unwrap();
    let difference = RedBlackSet::difference(&a, &b).unwrap();
    let symmetric_difference = RedBlackSet::symmetric_difference(&a, &b).unwrap();

    assert_eq!(union.len(), a.len() + b.len() - intersection.len());
    assert_eq!(
        symmetric_difference.len(),
        union.len() - intersection.len(),
    );
    for elem in &intersection {
        assert!(a.contains(elem) && b.contains(elem));
    }
    for elem in &difference {
        assert!(a.contains(elem) && !b.contains(elem));
    }
    for elem in &symmetric_difference {
        assert!(a.contains(elem) != b.contains(elem));
    }
    for elem in &union {
        assert!(a.contains(elem) || b.contains(elem));
    }

    for set in &[&union, &intersection, &difference, &symmetric_difference] {
        assert!(set.validate().is_ok());
    }

    assert_eq!(RedBlackSet::union(&a, &a).unwrap(), a);
    assert_eq!(RedBlackSet::intersection(&a, &a).unwrap(), a);
    assert!(RedBlackSet::difference(&a, &a).unwrap().is_empty());
}

#[test]
fn int_test_intersection_with_superset() {
    init_logger();
    let n = NUM_OF_OPERATIONS as u32;
    let odds = set_from((0..n).map(|i| 2 * i + 1));
    let more_odds = set_from((0..2 * n).map(|i| 2 * i + 1));

    let intersection = RedBlackSet::intersection(&odds, &more_odds).unwrap();
    assert_eq!(intersection, odds);

    let difference = RedBlackSet::difference(&more_odds, &odds).unwrap();
    assert_eq!(difference.len(), NUM_OF_OPERATIONS);
    for elem in &difference {
        assert!(more_odds.contains(elem) && !odds.contains(elem));
    }

    let evens = set_from((0..n).map(|i| 2 * i));
    let evens_again = set_from((0..n).map(|i| 2 * i));
    assert!(RedBlackSet::difference(&evens, &evens_again).unwrap().is_empty());
}

#[test]
fn int_test_shared_elements() {
    init_logger();
    let values = (0..100).collect::<Vec<u32>>();
    let mut low = RedBlackSet::with_comparator(Natural);
    let mut high = RedBlackSet::with_comparator(Natural);
    for value in &values {
        if *value < 60 {
            low.insert(value).unwrap();
        }
        if *value >= 40 {
            high.insert(value).unwrap();
        }
    }

    let intersection = RedBlackSet::intersection(&low, &high).unwrap();
    assert_eq!(intersection.len(), 20);
    for elem in intersection.iter() {
        assert!(ptr::eq(*elem, &values[**elem as usize]));
    }

    let union = RedBlackSet::union(&low, &high).unwrap();
    assert_eq!(union.len(), 100);
    assert!(union.iter().zip(values.iter()).all(|(a, b)| ptr::eq(*a, b)));
}

#[test]
fn int_test_abandoned_morris_iter() {
    init_logger();
    let mut set = set_from((0..NUM_OF_OPERATIONS as u32).rev());
    {
        let mut iter = set.morris_iter();
        for expected in 0..NUM_OF_OPERATIONS as u32 / 3 {
            assert_eq!(iter.next(), Some(&expected));
        }
    }
    assert!(set.validate().is_ok());
    assert_eq!(
        morris_elems(&mut set),
        (0..NUM_OF_OPERATIONS as u32).collect::<Vec<u32>>(),
    );
}

#[test]
fn int_test_leaked_morris_iter() {
    init_logger();
    let mut set = set_from(0..100);
    {
        let mut iter = set.morris_iter();
        for _ in 0..40 {
            iter.next();
        }
        mem::forget(iter);
    }

    assert!(set.validate().is_ok());
    assert!(set.contains(&99));
    assert_eq!(set.get(&100), None);
    assert_eq!(set.iter().count(), 100);

    assert_eq!(set.remove(&50), Some(50));
    assert!(set.validate().is_ok());
    assert_eq!(morris_elems(&mut set).len(), 99);
}
