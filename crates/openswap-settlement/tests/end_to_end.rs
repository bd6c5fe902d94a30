//! Full settlement flows through the public engine surface.

mod common;

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;

use common::*;
use openswap_settlement::OrderExecution;
use openswap_strategies::collection::CollectionOfferTakerParams;
use openswap_strategies::dutch::{DutchAuctionMakerParams, DutchAuctionTakerParams};
use openswap_strategies::standard::StandardTakerParams;
use openswap_types::{AssetType, MakerOrder, OpenswapError, OrderNonceStatus, TakerOrder};

const PRICE: u128 = 1_000_000;

#[test]
fn taker_bid_distributes_all_fee_legs() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    engine.set_affiliate_program_active(owner(), true).unwrap();
    engine.update_affiliate_rate(owner(), affiliate(), 2_000).unwrap();

    let mut execution = signed_ask(&engine, &key, PRICE);
    execution.affiliate = Some(affiliate());

    world.creator_fees.set_collection_royalty(execution.maker.collection, creator(), 50);
    world.ledger.deposit(Address::ZERO, taker(), PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    let event = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap();

    assert_eq!(event.price, PRICE);
    assert_eq!(event.fees.protocol_fee, 16_000);
    assert_eq!(event.fees.affiliate_fee, Some((affiliate(), 4_000)));
    assert_eq!(event.fees.creator_fee, Some((creator(), 5_000)));
    assert_eq!(event.fees.seller_proceeds, 975_000);
    assert_eq!(event.fees.total(), PRICE);

    assert_eq!(world.ledger.balance(Address::ZERO, taker()), 0);
    assert_eq!(world.ledger.balance(Address::ZERO, key.address()), 975_000);
    assert_eq!(world.ledger.balance(Address::ZERO, fee_recipient()), 16_000);
    assert_eq!(world.ledger.balance(Address::ZERO, creator()), 5_000);
    assert_eq!(world.ledger.balance(Address::ZERO, affiliate()), 4_000);
    assert_eq!(world.assets.owner_of(execution.maker.collection, 1), Some(taker()));
}

#[test]
fn taker_ask_settles_a_maker_bid() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let maker = MakerOrder::dummy_bid(key.address(), erc20(), PRICE);
    let execution = sign_order(&engine, &key, maker);

    // The maker is the buyer here: payment comes out of the signer's
    // balance, the asset comes from the taker.
    world.ledger.deposit(erc20(), key.address(), PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, taker());

    let event = engine.execute_taker_ask(&execution, &mut world.collab()).unwrap();

    assert_eq!(event.fees.protocol_fee, 20_000);
    assert_eq!(world.ledger.balance(erc20(), taker()), 980_000);
    assert_eq!(world.ledger.balance(erc20(), fee_recipient()), 20_000);
    assert_eq!(world.assets.owner_of(execution.maker.collection, 1), Some(key.address()));
}

#[test]
fn maker_bid_in_native_currency_rejected() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let maker = MakerOrder::dummy_bid(key.address(), Address::ZERO, PRICE);
    let execution = sign_order(&engine, &key, maker);

    let err = engine.execute_taker_ask(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::CurrencyInvalid(_)));
}

#[test]
fn taker_price_restatement_must_match_exactly() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let mut execution = signed_ask(&engine, &key, PRICE);
    world.ledger.deposit(Address::ZERO, taker(), 2 * PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    execution.taker.additional_parameters = serde_json::to_vec(&StandardTakerParams {
        price: PRICE - 1,
        item_ids: execution.maker.item_ids.clone(),
        amounts: execution.maker.amounts.clone(),
    })
    .unwrap();
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::OrderInvalid { .. }));

    execution.taker.additional_parameters = serde_json::to_vec(&StandardTakerParams {
        price: PRICE,
        item_ids: execution.maker.item_ids.clone(),
        amounts: execution.maker.amounts.clone(),
    })
    .unwrap();
    assert!(engine.execute_taker_bid(&execution, &mut world.collab()).is_ok());
}

#[test]
fn settled_order_cannot_be_replayed() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let execution = signed_ask(&engine, &key, PRICE);
    world.ledger.deposit(Address::ZERO, taker(), 2 * PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    engine.execute_taker_bid(&execution, &mut world.collab()).unwrap();

    // Give the asset back so only the nonce can stop the replay.
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::WrongNonces));
}

#[test]
fn shared_order_nonce_fills_at_most_one() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    // Two different orders deliberately sharing order nonce 0.
    let first = signed_ask(&engine, &key, PRICE);
    let mut second_maker = MakerOrder::dummy_ask(key.address(), PRICE / 2);
    second_maker.item_ids = vec![2];
    let second = sign_order(&engine, &key, second_maker);

    world.ledger.deposit(Address::ZERO, taker(), 2 * PRICE);
    world.assets.mint_erc721(first.maker.collection, 1, key.address());
    world.assets.mint_erc721(first.maker.collection, 2, key.address());

    engine.execute_taker_bid(&first, &mut world.collab()).unwrap();
    let err = engine.execute_taker_bid(&second, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::WrongNonces));
}

#[test]
fn global_nonce_increment_is_side_scoped() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let stale_ask = signed_ask(&engine, &key, PRICE);
    let bid = sign_order(&engine, &key, MakerOrder::dummy_bid(key.address(), erc20(), PRICE));

    engine.increment_nonces(key.address(), false, true).unwrap();

    world.ledger.deposit(Address::ZERO, taker(), PRICE);
    world.ledger.deposit(erc20(), key.address(), PRICE);
    world.assets.mint_erc721(stale_ask.maker.collection, 1, key.address());

    let err = engine.execute_taker_bid(&stale_ask, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::WrongNonces));

    // The bid side was not bumped; the maker bid still settles.
    world.assets.mint_erc721(bid.maker.collection, 1, taker());
    assert!(engine.execute_taker_ask(&bid, &mut world.collab()).is_ok());

    // An ask signed against the new counter is live.
    let mut fresh_maker = MakerOrder::dummy_ask(key.address(), PRICE);
    fresh_maker.global_nonce = 1;
    fresh_maker.order_nonce = 1;
    let fresh = sign_order(&engine, &key, fresh_maker);
    world.assets.mint_erc721(fresh.maker.collection, 1, key.address());
    assert!(engine.execute_taker_bid(&fresh, &mut world.collab()).is_ok());
}

#[test]
fn subset_cancellation_invalidates_carriers() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let mut maker = MakerOrder::dummy_ask(key.address(), PRICE);
    maker.subset_nonce = 7;
    let execution = sign_order(&engine, &key, maker);

    engine.cancel_subset_nonces(key.address(), &[7]).unwrap();

    world.ledger.deposit(Address::ZERO, taker(), PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::WrongNonces));
}

#[test]
fn failed_transfer_unwinds_all_effects() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let execution = signed_ask(&engine, &key, PRICE);
    // Enough for the seller leg (980_000) but not the protocol fee.
    world.ledger.deposit(Address::ZERO, taker(), 980_000);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::InsufficientBalance { .. }));

    assert_eq!(world.ledger.balance(Address::ZERO, taker()), 980_000);
    assert_eq!(world.ledger.balance(Address::ZERO, key.address()), 0);
    assert_eq!(world.assets.owner_of(execution.maker.collection, 1), Some(key.address()));
    assert_eq!(
        engine.user_nonces(key.address()).order_status(0),
        OrderNonceStatus::Unused
    );
}

#[test]
fn collection_offer_fills_cumulatively() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();
    let strategy_id = register_collection_offer(&mut engine);

    let mut maker = MakerOrder::dummy_bid(key.address(), erc20(), 100);
    maker.strategy_id = strategy_id;
    maker.asset_type = AssetType::Erc1155;
    maker.item_ids = Vec::new();
    maker.amounts = vec![5];
    let mut execution = sign_order(&engine, &key, maker);

    world.ledger.deposit(erc20(), key.address(), 500);
    world.assets.mint_erc1155(execution.maker.collection, 7, taker(), 5);

    execution.taker.additional_parameters =
        serde_json::to_vec(&CollectionOfferTakerParams { item_id: 7, amount: 2 }).unwrap();
    let event = engine.execute_taker_ask(&execution, &mut world.collab()).unwrap();
    assert_eq!(event.price, 200, "per-unit pricing");
    assert!(!event.nonce_fully_consumed);

    execution.taker.additional_parameters =
        serde_json::to_vec(&CollectionOfferTakerParams { item_id: 7, amount: 3 }).unwrap();
    let event = engine.execute_taker_ask(&execution, &mut world.collab()).unwrap();
    assert!(event.nonce_fully_consumed);

    assert_eq!(world.assets.units_of(execution.maker.collection, 7, key.address()), 5);
    assert_eq!(engine.user_nonces(key.address()).order_status(0), OrderNonceStatus::FullyExecuted);

    // The budget is spent; a third fill is a replay.
    execution.taker.additional_parameters =
        serde_json::to_vec(&CollectionOfferTakerParams { item_id: 7, amount: 1 }).unwrap();
    let err = engine.execute_taker_ask(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::WrongNonces));
}

#[test]
fn dutch_auction_enforces_price_bound() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();
    let strategy_id = register_dutch_auction(&mut engine);

    // Start price equal to the floor keeps the current price constant,
    // independent of the wall clock.
    let mut maker = MakerOrder::dummy_ask(key.address(), 2_000);
    maker.strategy_id = strategy_id;
    maker.additional_parameters =
        serde_json::to_vec(&DutchAuctionMakerParams { start_price: 2_000 }).unwrap();
    let mut execution = sign_order(&engine, &key, maker);

    world.ledger.deposit(Address::ZERO, taker(), 10_000);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    execution.taker.additional_parameters =
        serde_json::to_vec(&DutchAuctionTakerParams { max_price: 1_999 }).unwrap();
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::BidTooLow { current: 2_000, .. }));

    execution.taker.additional_parameters =
        serde_json::to_vec(&DutchAuctionTakerParams { max_price: 5_000 }).unwrap();
    let event = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap();
    assert_eq!(event.price, 2_000, "settles at the current price, not the bid");
}

#[test]
fn contract_signer_path() {
    let mut engine = engine();
    let mut world = World::new();
    let contract_signer = Address::repeat_byte(0x5c);

    let maker = MakerOrder::dummy_ask(contract_signer, PRICE);
    let execution = OrderExecution {
        taker: TakerOrder::new(taker()),
        maker,
        signature: vec![0xab; 12],
        merkle: None,
        affiliate: None,
    };

    world.ledger.deposit(Address::ZERO, taker(), 2 * PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, contract_signer);

    world.signers.register(contract_signer, false);
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::ContractSignerRejected(_)));

    world.signers.register(contract_signer, true);
    assert!(engine.execute_taker_bid(&execution, &mut world.collab()).is_ok());
}

#[test]
fn chain_drift_blocks_settlement_until_rebind() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let execution = signed_ask(&engine, &key, PRICE);
    world.ledger.deposit(Address::ZERO, taker(), 2 * PRICE);
    world.assets.mint_erc721(execution.maker.collection, 1, key.address());

    engine.set_chain_id(owner(), 5).unwrap();
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(
        err,
        OpenswapError::ChainIdMismatch { bound: 1, current: 5 }
    ));

    // Rebinding the domain invalidates signatures made under the old one.
    let old_separator = engine.domain_separator();
    engine.update_domain_separator(owner()).unwrap();
    assert_ne!(engine.domain_separator(), old_separator);
    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::SignerMismatch { .. }));

    // Re-signing under the rebound domain settles.
    let resigned = sign_order(&engine, &key, execution.maker.clone());
    assert!(engine.execute_taker_bid(&resigned, &mut world.collab()).is_ok());
}

#[test]
fn quote_type_must_match_entry_point() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let ask = signed_ask(&engine, &key, PRICE);
    let err = engine.execute_taker_ask(&ask, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::QuoteTypeInvalid));

    let bid = sign_order(&engine, &key, MakerOrder::dummy_bid(key.address(), erc20(), PRICE));
    let err = engine.execute_taker_bid(&bid, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::QuoteTypeInvalid));
}

#[test]
fn expired_order_rejected() {
    let mut engine = engine();
    let mut world = World::new();
    let key = PrivateKeySigner::random();

    let mut maker = MakerOrder::dummy_ask(key.address(), PRICE);
    maker.end_time = 10;
    let execution = sign_order(&engine, &key, maker);

    let err = engine.execute_taker_bid(&execution, &mut world.collab()).unwrap_err();
    assert!(matches!(err, OpenswapError::OutsideOfTimeRange { .. }));
}
