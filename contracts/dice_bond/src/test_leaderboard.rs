extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::leaderboard::Leaderboard;
use crate::storage::{LeaderboardCategory, LEADERBOARD_CAPACITY};
use crate::test_helpers::TestSetup;
use crate::Error;

const YIELD: LeaderboardCategory = LeaderboardCategory::CumulativeYield;

fn update(s: &TestSetup, holder: &Address, value: i128) -> u32 {
    s.env.as_contract(&s.client.address, || {
        Leaderboard::new(&s.env).update(YIELD, holder, value)
    })
}

fn values(s: &TestSetup) -> std::vec::Vec<i128> {
    s.client
        .get_leaderboard(&(YIELD as u32), &LEADERBOARD_CAPACITY)
        .iter()
        .map(|entry| entry.value)
        .collect()
}

#[test]
fn test_entries_sorted_descending() {
    let s = TestSetup::new();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    let c = Address::generate(&s.env);

    assert_eq!(update(&s, &a, 30), 1);
    assert_eq!(update(&s, &b, 50), 1);
    assert_eq!(update(&s, &c, 40), 2);

    assert_eq!(values(&s), std::vec![50, 40, 30]);
}

#[test]
fn test_holder_appears_once() {
    let s = TestSetup::new();
    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);

    update(&s, &a, 10);
    update(&s, &b, 20);
    assert_eq!(update(&s, &a, 25), 1);

    let board = s.client.get_leaderboard(&(YIELD as u32), &10);
    assert_eq!(board.len(), 2);
    assert_eq!(board.get(0).unwrap().holder, a);
    assert_eq!(board.get(1).unwrap().holder, b);
}

#[test]
fn test_capacity_and_cutoff() {
    let s = TestSetup::new();
    for i in 1..=LEADERBOARD_CAPACITY {
        let holder = Address::generate(&s.env);
        update(&s, &holder, i as i128 * 10);
    }
    assert_eq!(values(&s).len(), LEADERBOARD_CAPACITY as usize);

    // Below and equal to the last entry: rejected.
    let low = Address::generate(&s.env);
    assert_eq!(update(&s, &low, 5), 0);
    assert_eq!(update(&s, &low, 10), 0);
    assert_eq!(*values(&s).last().unwrap(), 10);

    // Strictly above the last entry: takes its place.
    assert_eq!(update(&s, &low, 15), LEADERBOARD_CAPACITY);
    let vals = values(&s);
    assert_eq!(vals.len(), LEADERBOARD_CAPACITY as usize);
    assert_eq!(*vals.last().unwrap(), 15);
    assert_eq!(vals[0], 100);
}

#[test]
fn test_tie_keeps_incumbent_first() {
    let s = TestSetup::new();
    let first = Address::generate(&s.env);
    let second = Address::generate(&s.env);

    update(&s, &first, 50);
    s.advance_time(60);
    assert_eq!(update(&s, &second, 50), 2);

    let board = s.client.get_leaderboard(&(YIELD as u32), &2);
    assert_eq!(board.get(0).unwrap().holder, first);
    assert_eq!(board.get(1).unwrap().holder, second);
}

#[test]
fn test_tie_at_same_time_keeps_incumbent_first() {
    let s = TestSetup::new();
    let first = Address::generate(&s.env);
    let second = Address::generate(&s.env);

    update(&s, &first, 50);
    assert_eq!(update(&s, &second, 50), 2);
}

#[test]
fn test_query_validation() {
    let s = TestSetup::new();
    assert_eq!(
        s.client.try_get_leaderboard(&3, &5),
        Err(Ok(Error::InvalidCategory))
    );
    assert_eq!(
        s.client.try_get_leaderboard(&0, &0),
        Err(Ok(Error::InvalidLimit))
    );
    assert_eq!(
        s.client.try_get_leaderboard(&0, &(LEADERBOARD_CAPACITY + 1)),
        Err(Ok(Error::InvalidLimit))
    );
    assert_eq!(s.client.get_leaderboard(&2, &10).len(), 0);
}

#[test]
fn test_limit_truncates() {
    let s = TestSetup::new();
    for i in 1..=5 {
        let holder = Address::generate(&s.env);
        update(&s, &holder, i);
    }
    let top = s.client.get_leaderboard(&(YIELD as u32), &3);
    assert_eq!(top.len(), 3);
    assert_eq!(top.get(0).unwrap().value, 5);
    assert_eq!(top.get(2).unwrap().value, 3);
}

#[test]
fn test_rolls_feed_boards() {
    let s = TestSetup::new();
    let alice = s.new_holder();
    let bob = s.new_holder();
    let alice_bond = s.issue_bond(&alice);
    let bob_bond = s.issue_bond(&bob);

    s.roll(&alice, alice_bond, 2); // 3
    s.roll(&bob, bob_bond, 4); // 5
    s.roll(&alice, alice_bond, 0); // 1, not a new best

    let highest = s
        .client
        .get_leaderboard(&(LeaderboardCategory::HighestRoll as u32), &10);
    assert_eq!(highest.len(), 2);
    assert_eq!(highest.get(0).unwrap().holder, bob);
    assert_eq!(highest.get(0).unwrap().value, 5);
    assert_eq!(highest.get(1).unwrap().value, 3);

    // 2.08 for bob against 1.25 + 0.42 for alice.
    let cumulative = s.client.get_leaderboard(&(YIELD as u32), &10);
    assert_eq!(cumulative.get(0).unwrap().holder, bob);
    assert_eq!(cumulative.get(1).unwrap().holder, alice);
    assert_eq!(
        cumulative.get(1).unwrap().value,
        s.client.get_holder_stats(&alice).total_bonus_yield
    );
}
