//! The default rule set and a matching asset resolver for Ethereum mainnet.

use alloy_primitives::{address, b256, Address, B256};
use buchfink_core::{
    fingerprint::{CLAIMED, TRANSFER},
    AmountSource, AssetSource, CatalogError, CompanionSpec, CompanionToken, EventKind, EventRule,
    EventSubtype, Guard, StaticAssetResolver,
};

use crate::catalog::{SignatureCatalog, SignatureCatalogBuilder};

/// `RewardPaid(address,uint256)`
pub const REWARD_PAID: B256 =
    b256!("e2403640ba68fed3a2f88b7557551d1993f84b99bb10ff833f0cf8db0c5e0486");

/// `Minted(address,address,uint256)`
pub const MINTED: B256 =
    b256!("9d228d69b5fdb8d273a2336f8fb8612d039631024ea9bf09c424a9503aa078f0");

/// `StakeEnd(uint256,uint256,address,uint40)`
pub const STAKE_END: B256 =
    b256!("72d9c5a7ab13846e08d9c838f9e866a1bb4a66a2fd3ba3c9e7da3cf9e394dfd7");

/// Uniswap UNI merkle distributor.
pub const UNISWAP_AIRDROP: Address = address!("090d4613473dee047c3f2706764f49e0821d256e");

/// Uniswap liquidity-mining staking pools (ETH/USDT, ETH/USDC, ETH/DAI, ETH/WBTC).
pub const UNISWAP_REWARD_POOLS: [Address; 4] = [
    address!("6c3e4cb2e96b01f4b866965a91ed4437839a121a"),
    address!("7fba4b8dc5e7616e59622806932dbea72537a56b"),
    address!("a1484c3aa22a66c62b77e0ae78e15258bd0cb711"),
    address!("ca35e32e7926b96a9988f61d510e038108d8068e"),
];

pub const CURVE_MINTER: Address = address!("d061d61a4d941c39e5453435b6345dc261c2fce0");

pub const UNI: Address = address!("1f9840a85d5af5bf1d1762f925bdaddc4201f984");
pub const CRV: Address = address!("d533a949740bb3306d119cc777fa900ba034cd52");
pub const HEX: Address = address!("2b591e99afe9f32eaa6214f7b7629768c40eeb39");
pub const DAI: Address = address!("6b175474e89094c44da98b954eedeac495271d0f");

/// The built-in rules, in registration order.
pub fn rules() -> Vec<EventRule> {
    vec![
        EventRule::new("UniswapAirdrop", CLAIMED)
            .contracts([UNISWAP_AIRDROP])
            .guard(Guard::DataWordIsAccount { word: 1 })
            .amount(AmountSource::DataWord(2))
            .asset(AssetSource::Symbol("UNI".into()))
            .classify_as(EventKind::Receive, EventSubtype::Airdrop),
        EventRule::new("UniswapLiquidityReward", REWARD_PAID)
            .contracts(UNISWAP_REWARD_POOLS)
            .guard(Guard::TopicIsAccount { topic: 1 })
            .amount(AmountSource::DataWord(0))
            .asset(AssetSource::Symbol("UNI".into()))
            .classify_as(EventKind::Receive, EventSubtype::Reward),
        EventRule::new("CurveMint", MINTED)
            .contracts([CURVE_MINTER])
            .guard(Guard::TopicIsAccount { topic: 1 })
            .amount(AmountSource::Companion(CompanionSpec::erc20_transfer(
                CompanionToken::Address(CRV),
            )))
            .asset(AssetSource::Symbol("CRV".into()))
            .classify_as(EventKind::Receive, EventSubtype::Reward),
        EventRule::new("HexStakeEnd", STAKE_END)
            .contracts([HEX])
            .guard(Guard::TopicIsAccount { topic: 1 })
            .amount(AmountSource::Companion(CompanionSpec::erc20_transfer(
                CompanionToken::Address(HEX),
            )))
            .asset(AssetSource::Symbol("HEX".into()))
            .decimals(8)
            .classify_as(EventKind::Staking, EventSubtype::Reward),
        EventRule::new("DaiMint", TRANSFER)
            .contracts([DAI])
            .guard(Guard::TopicOneOf {
                topic: 1,
                addresses: vec![Address::ZERO],
            })
            .guard(Guard::TopicIsAccount { topic: 2 })
            .amount(AmountSource::DataWord(0))
            .asset(AssetSource::Symbol("DAI".into()))
            .classify_as(EventKind::Receive, EventSubtype::Mint),
    ]
}

/// Add the built-in rules to `builder`.
pub fn register(builder: &mut SignatureCatalogBuilder) -> Result<(), CatalogError> {
    builder.extend(rules())
}

/// A catalog holding only the built-in rules.
pub fn catalog() -> Result<SignatureCatalog, CatalogError> {
    let mut builder = SignatureCatalog::builder();
    register(&mut builder)?;
    Ok(builder.build())
}

/// Resolver for every asset the built-in rules refer to.
pub fn asset_resolver() -> StaticAssetResolver {
    StaticAssetResolver::new()
        .with_symbol("ETH", "ETH")
        .with_token("UNI", UNI, "eip155:1/erc20:0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984")
        .with_token("CRV", CRV, "eip155:1/erc20:0xD533a949740bb3306d119CC777fa900bA034cd52")
        .with_token("HEX", HEX, "eip155:1/erc20:0x2b591e99afE9f32eAA6214f7B7629768c40Eeb39")
        .with_token("DAI", DAI, "eip155:1/erc20:0x6B175474E89094C44Da98b954EedeAC495271d0F")
}
