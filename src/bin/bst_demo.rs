//! Walks through the public `BsTree` API and prints what happens.
//!
//! Set `RUST_LOG=debug` (or `trace`) to see the tree's own structural logging.

use bst_map::{BsTree, TreeIterator};

type Tree = BsTree<i32, i32>;

fn report_find(tree: &Tree, key: i32) {
    match tree.find(&key).get() {
        Some((found, value)) => println!("find({}) -> {} => {}", key, found, value),
        None => println!("find({}) -> not found", key),
    }
}

fn main() {
    env_logger::init();

    let mut bst = Tree::new();
    let sample = [
        (8, 1),
        (3, 4),
        (10, 55),
        (1, 55),
        (6, 55),
        (4, 11),
        (7, 33),
        (14, 33),
        (13, 23),
    ];
    for (key, value) in sample {
        let (_, inserted) = bst.insert(key, value);
        log::info!("insert({}) inserted={}", key, inserted);
    }
    let (_, inserted) = bst.emplace(8, 99);
    println!("emplace(8) on an existing key inserted={}", inserted);

    print!("cursor walk: ");
    let mut it = bst.begin();
    while it != bst.end() {
        print!("{} ", it.key());
        it.forward();
    }
    println!();
    println!("{}", bst);
    println!("stats before balance: {:?}", bst.stats());

    for key in [6, 13, 12, 5] {
        report_find(&bst, key);
    }

    bst.balance();
    println!("stats after balance:  {:?}", bst.stats());
    print!("{:?}", bst);

    println!("bst[3] = {}", bst.get_or_insert_default(3));
    println!("bst[9] = {}", bst.get_or_insert_default(9));
    *bst.get_or_insert_default(10) += 1;
    println!("bst[10] = {}", bst.get_or_insert_default(10));

    let mut copy = bst.clone();
    bst.emplace(-2, 2);
    bst.emplace(11, 3);
    copy.emplace(-5, 22);
    copy.emplace(2, 2);
    copy.emplace(21, 0);
    println!("original: {}", bst);
    println!("copy:     {}", copy);

    let mut moved = std::mem::take(&mut copy);
    println!("moved:    {}", moved);
    println!("source:   {}", copy);
    moved.clear();
    println!("cleared:  {}", moved);

    for key in [3, 7, 11, 13, -2, 4, 100] {
        let erased = bst.erase(&key);
        println!("erase({}) -> {}", key, erased);
    }
    println!("{}", bst);

    if let Err(e) = bst.verify() {
        eprintln!("tree invariant broken: {}", e);
        std::process::exit(1);
    }
}
