mod utils;

use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;

use rust_decimal_macros::dec;
use serde_json::{from_str, to_string};

use market_site::domain::{Command, Condition, DiscountPolicy, Scope, User};
use market_site::engine::Marketplace;
use market_site::money::Amount;
use market_site::persistence::json_file::{append_command, read_commands, write_commands};
use utils::*;

#[test]
fn test_amount_string_format() {
    let amount = sek(dec!(100.50));
    assert_eq!(amount.to_string(), "SEK100.50");
    assert_eq!(Amount::from_str("SEK100.50").unwrap(), amount);

    // serde goes through the same string format
    let serialized = to_string(&amount).unwrap();
    assert_eq!(serialized, "\"SEK100.50\"");
    let deserialized: Amount = from_str(&serialized).unwrap();
    assert_eq!(deserialized, amount);
}

#[test]
fn test_user_pipe_format() {
    let user = buyer_1();
    assert_eq!(user.to_string(), "Member|Buyer_1|Buyer 1");

    let serialized = to_string(&user).unwrap();
    let deserialized: User = from_str(&serialized).unwrap();
    assert_eq!(deserialized, user);

    let support: User = from_str("\"Support|Agent_1\"").unwrap();
    assert_eq!(
        support,
        User::Support {
            user_id: "Agent_1".to_string()
        }
    );
}

#[test]
fn test_condition_string_format() {
    let condition = Condition::MinQuantity {
        product_id: 42,
        at_least: 3,
    };
    assert_eq!(condition.to_string(), "MinQuantity|42|3");
    assert_eq!(Condition::from_str("MinQuantity|42|3").unwrap(), condition);

    let total = Condition::MinTotal {
        at_least: sek(dec!(100)),
    };
    assert_eq!(total.to_string(), "MinTotal|SEK100");
    assert_eq!(Condition::from_str("MinTotal|SEK100").unwrap(), total);
}

#[test]
fn test_discount_policy_round_trip_preserves_ids() {
    let left = DiscountPolicy::conditional(
        Scope::Products {
            products: BTreeSet::from([gadget_id()]),
        },
        Condition::MinQuantity {
            product_id: gadget_id(),
            at_least: 2,
        },
        dec!(20),
    )
    .unwrap();
    let right = DiscountPolicy::simple(Scope::Store, dec!(10)).unwrap();
    let policy = DiscountPolicy::one_of(left, right);

    let serialized = to_string(&policy).unwrap();
    assert!(serialized.contains("\"$type\":\"Xor\""));

    let deserialized: DiscountPolicy = from_str(&serialized).unwrap();
    assert_eq!(deserialized, policy);
}

#[test]
fn test_command_round_trip() {
    let command = Command::PlaceBid {
        timestamp: sample_bid_time(),
        store_id: sample_store_id(),
        bid: bid(buyer_1(), sek(dec!(60))),
    };

    let serialized = to_string(&command).unwrap();
    assert!(serialized.contains("\"$type\":\"PlaceBid\""));

    let deserialized: Command = from_str(&serialized).unwrap();
    assert_eq!(deserialized, command);
}

#[test]
fn test_read_sample_journal() {
    // Read sample commands from file
    let commands = read_commands("./tests/samples/sample-commands.jsonl");
    assert!(commands.is_ok());
    assert!(!commands.unwrap().is_empty());
}

#[test]
fn test_journal_append_and_read_round_trip() {
    let path = std::env::temp_dir().join(format!(
        "market-site-journal-{}.jsonl",
        std::process::id()
    ));
    let _ = fs::remove_file(&path);

    let commands = vec![
        Command::OpenStore {
            timestamp: sample_opened_at(),
            store: sample_store(),
        },
        Command::StartAuction {
            timestamp: sample_opened_at(),
            store_id: sample_store_id(),
            product_id: gadget_id(),
            duration_days: 30,
        },
    ];

    for command in &commands {
        append_command(&path, command).unwrap();
    }
    assert_eq!(read_commands(&path).unwrap(), commands);

    // write_commands rewrites the whole journal
    write_commands(&path, &commands[..1]).unwrap();
    assert_eq!(read_commands(&path).unwrap(), commands[..1].to_vec());

    let _ = fs::remove_file(&path);
}

#[test]
fn test_replaying_the_sample_journal_rebuilds_state() {
    let commands = read_commands("./tests/samples/sample-commands.jsonl").unwrap();
    let marketplace = Marketplace::replay(commands);

    // The journal holds the gadget at base 50, one bid at 60 on its open
    // auction and a 10% store-wide discount
    let snapshot = marketplace.snapshot(sample_store_id()).unwrap();
    assert_eq!(snapshot.store.title, "general store");
    assert_eq!(snapshot.auctions.len(), 1);
    assert_eq!(snapshot.auctions[0].current_level(), sek(dec!(60)));
    assert_eq!(snapshot.policies.len(), 1);

    // The auction is still open, so a quote prices the gadget at base
    // minus the store discount
    let lines = HashMap::from([(gadget_id(), 1)]);
    let charge = marketplace
        .quote(sample_store_id(), &"Buyer_2".to_string(), &lines)
        .unwrap();
    assert_eq!(charge, sek(dec!(45)));
}
