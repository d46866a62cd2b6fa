use pooled_bst::{NodePool, Tree};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use crate::Op;

/// Applies a set of operations to a tree and a set.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of values in both.
fn do_ops<T>(ops: &[Op<T>], bst: &mut Tree<T>, set: &mut BTreeSet<T>)
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                assert_eq!(bst.insert(x.clone()), Ok(set.insert(x.clone())));
            }
            Op::Remove(x) => {
                assert_eq!(bst.remove(x), set.remove(x));
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.is_valid_bst() && tree.len() == set.len() && tree.iter().eq(set.iter())
}

#[quickcheck]
fn in_order_is_sorted_and_deduplicated(xs: Vec<i32>) -> bool {
    let mut tree = Tree::new();
    tree.insert_batch(xs.iter().copied()).unwrap();

    let mut expected = xs;
    expected.sort_unstable();
    expected.dedup();

    tree.to_vec() == expected && tree.len() == expected.len()
}

#[quickcheck]
fn inserting_twice_is_idempotent(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.insert_batch(xs.iter().copied()).unwrap();
    let before = tree.to_vec();

    let added = tree.insert_batch(xs.iter().copied()).unwrap();
    added == 0 && tree.to_vec() == before
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.insert_batch(xs.iter().copied()).unwrap();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    tree.insert_batch(xs.iter().copied()).unwrap();

    let mut len = tree.len();
    for delete in &deletes {
        let was_there = tree.contains(delete);
        if tree.remove(delete) != was_there {
            return false;
        }
        if was_there {
            len -= 1;
        }
        if tree.len() != len || tree.contains(delete) {
            return false;
        }
    }

    let mut still_present = xs.iter().filter(|x| !deletes.contains(x));
    tree.is_valid_bst() && still_present.all(|x| tree.contains(x))
}

#[quickcheck]
fn shared_pool_never_exceeds_capacity(xs: Vec<u8>, ys: Vec<u8>) -> bool {
    let pool = NodePool::shared(16);
    let mut first = Tree::with_pool(Rc::clone(&pool));
    let mut second = Tree::with_pool(Rc::clone(&pool));

    first.insert_batch(xs.iter().copied()).unwrap();
    second.insert_batch(ys.iter().copied()).unwrap();
    for x in &xs {
        first.remove(x);
    }
    second.clear();

    let pooled = pool.borrow().len();
    pooled <= 16 && first.is_empty() && second.is_empty()
}
