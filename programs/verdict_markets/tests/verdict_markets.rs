//! End-to-end instruction tests against an in-process banks server.
//!
//! One funded actor plays every role (admin, creator, validator, bettor);
//! phase transitions are driven by rewriting the clock sysvar. Each test
//! spins up its own genesis so pool ids never collide across tests.

use anchor_lang::prelude::AccountInfo;
use anchor_lang::solana_program::entrypoint::ProgramResult;
use anchor_lang::{AccountDeserialize, InstructionData, ToAccountMetas};
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::spl_token;
use solana_program_test::{
    processor, tokio, BanksClientError, ProgramTest, ProgramTestContext,
};
use solana_sdk::{
    account::Account as SolanaAccount,
    clock::Clock,
    instruction::{Instruction, InstructionError},
    program_option::COption,
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_program,
    transaction::{Transaction, TransactionError},
};

use verdict_markets::state::{BondingParams, MarketParams, OptionGroup, StakeAccount};
use verdict_markets::{ClaimPayoutError, ClaimRewardError, SetOptionsError, VoteError};

// Anchor's generated entry pins the account slice to a single lifetime;
// the banks-server processor signature does not, so bridge the two here.
fn program_entry(program_id: &Pubkey, accounts: &[AccountInfo], data: &[u8]) -> ProgramResult {
    verdict_markets::entry(program_id, unsafe { core::mem::transmute(accounts) }, data)
}

fn bonding_params() -> BondingParams {
    BondingParams {
        evaluation_duration: 100,
        option_voting_gap: 10,
        option_voting_duration: 100,
        dispute_duration: 100,
        min_votes_required: 1,
        initial_per_option_cap: 10,
        max_vote_difference: 3,
        pool_creation_fee: 0,
        good_pool_reward: 500,
        bad_pool_penalty: 500,
        true_eval_reward: 100,
        false_eval_penalty: 100,
        true_dispute_reward: 150,
        false_dispute_penalty: 150,
    }
}

fn market_params(bootstrap: bool) -> MarketParams {
    MarketParams {
        early_exit_fee_bps: 0,
        platform_fee_bps: 0,
        default_option_liquidity: if bootstrap { 100 } else { 0 },
        bootstrap_liquidity: bootstrap,
        auto_unfreeze_delay: 1_000,
    }
}

fn pda(seeds: &[&[u8]]) -> Pubkey {
    Pubkey::find_program_address(seeds, &verdict_markets::ID).0
}

fn pool_addrs(pool_id: u64) -> (Pubkey, Pubkey) {
    let id = pool_id.to_le_bytes();
    (pda(&[b"pool", id.as_ref()]), pda(&[b"group", id.as_ref()]))
}

fn mint_account() -> SolanaAccount {
    let state = spl_token::state::Mint {
        mint_authority: COption::None,
        supply: 10_000_000,
        decimals: 6,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    let mut data = vec![0u8; spl_token::state::Mint::LEN];
    spl_token::state::Mint::pack(state, &mut data).unwrap();
    SolanaAccount {
        lamports: 1_000_000_000,
        data,
        owner: spl_token::ID,
        executable: false,
        rent_epoch: 0,
    }
}

fn token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> SolanaAccount {
    let state = spl_token::state::Account {
        mint: *mint,
        owner: *owner,
        amount,
        delegate: COption::None,
        state: spl_token::state::AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    };
    let mut data = vec![0u8; spl_token::state::Account::LEN];
    spl_token::state::Account::pack(state, &mut data).unwrap();
    SolanaAccount {
        lamports: 1_000_000_000,
        data,
        owner: spl_token::ID,
        executable: false,
        rent_epoch: 0,
    }
}

fn ix(accounts: impl ToAccountMetas, args: impl InstructionData) -> Instruction {
    Instruction {
        program_id: verdict_markets::ID,
        accounts: accounts.to_account_metas(None),
        data: args.data(),
    }
}

struct Env {
    ctx: ProgramTestContext,
    actor: Keypair,
    mint: Pubkey,
    treasury: Pubkey,
    config: Pubkey,
    actor_ata: Pubkey,
    treasury_ata: Pubkey,
    protocol_ata: Pubkey,
    t0: i64,
}

async fn setup(bootstrap: bool) -> Env {
    let mut pt = ProgramTest::new(
        "verdict_markets",
        verdict_markets::ID,
        processor!(program_entry),
    );

    let actor = Keypair::new();
    pt.add_account(
        actor.pubkey(),
        SolanaAccount {
            lamports: 10_000_000_000,
            data: vec![],
            owner: system_program::ID,
            executable: false,
            rent_epoch: 0,
        },
    );

    let mint = Pubkey::new_unique();
    pt.add_account(mint, mint_account());

    let treasury = Pubkey::new_unique();
    let config = pda(&[b"config"]);
    let actor_ata = get_associated_token_address(&actor.pubkey(), &mint);
    let treasury_ata = get_associated_token_address(&treasury, &mint);
    let protocol_ata = get_associated_token_address(&config, &mint);

    pt.add_account(actor_ata, token_account(&mint, &actor.pubkey(), 1_000_000));
    pt.add_account(treasury_ata, token_account(&mint, &treasury, 0));
    if bootstrap {
        pt.add_account(protocol_ata, token_account(&mint, &config, 10_000));
    }

    let mut ctx = pt.start_with_context().await;
    let clock: Clock = ctx.banks_client.get_sysvar().await.unwrap();
    let t0 = clock.unix_timestamp;

    let mut env = Env {
        ctx,
        actor,
        mint,
        treasury,
        config,
        actor_ata,
        treasury_ata,
        protocol_ata,
        t0,
    };

    let stake = pda(&[b"stake", env.actor.pubkey().as_ref()]);
    let ixs = vec![
        ix(
            verdict_markets::accounts::Initialize {
                admin: env.actor.pubkey(),
                config,
                collateral_mint: mint,
                treasury,
                system_program: system_program::ID,
            },
            verdict_markets::instruction::Initialize {
                bonding: bonding_params(),
                market: market_params(bootstrap),
            },
        ),
        ix(
            verdict_markets::accounts::SetStakeRole {
                authority: env.actor.pubkey(),
                config,
                delegate: None,
                stake,
                system_program: system_program::ID,
            },
            verdict_markets::instruction::SetStakeRole {
                owner: env.actor.pubkey(),
                amount: 1_000,
                is_validator: true,
                is_pool_creator: true,
                is_evaluator: true,
            },
        ),
    ];
    send(&mut env, &ixs).await.unwrap();
    env
}

/// Warp to a fresh slot (so repeated messages get new blockhashes) and pin
/// the clock to `t`. Warping recomputes the clock, so pin after the warp.
async fn advance(ctx: &mut ProgramTestContext, t: i64) {
    let slot = ctx.banks_client.get_root_slot().await.unwrap();
    ctx.warp_to_slot(slot + 2).unwrap();
    let mut clock: Clock = ctx.banks_client.get_sysvar().await.unwrap();
    clock.unix_timestamp = t;
    ctx.set_sysvar(&clock);
}

async fn send(env: &mut Env, ixs: &[Instruction]) -> Result<(), BanksClientError> {
    let blockhash = env.ctx.banks_client.get_latest_blockhash().await.unwrap();
    let tx = Transaction::new_signed_with_payer(
        ixs,
        Some(&env.ctx.payer.pubkey()),
        &[&env.ctx.payer, &env.actor],
        blockhash,
    );
    env.ctx.banks_client.process_transaction(tx).await
}

fn assert_custom(err: BanksClientError, code: u32) {
    assert_eq!(
        err.unwrap(),
        TransactionError::InstructionError(0, InstructionError::Custom(code))
    );
}

fn option_names() -> Vec<String> {
    vec!["yes".to_string(), "no".to_string()]
}

fn create_pool_ix(env: &Env, pool_id: u64, start: i64, settle: i64) -> Instruction {
    let (pool, group) = pool_addrs(pool_id);
    ix(
        verdict_markets::accounts::CreatePool {
            creator: env.actor.pubkey(),
            config: env.config,
            creator_stake: pda(&[b"stake", env.actor.pubkey().as_ref()]),
            pool,
            group,
            collateral_mint: env.mint,
            creator_collateral: env.actor_ata,
            treasury: env.treasury,
            treasury_collateral: env.treasury_ata,
            vault: get_associated_token_address(&group, &env.mint),
            token_program: spl_token::ID,
            associated_token_program: anchor_spl::associated_token::ID,
            system_program: system_program::ID,
        },
        verdict_markets::instruction::CreatePool {
            pool_id,
            title: "Which outcome?".to_string(),
            data: String::new(),
            start_timeframe: start,
            settle_timeframe: settle,
        },
    )
}

fn set_options_ix(env: &Env, pool_id: u64, protocol_vault: Option<Pubkey>) -> Instruction {
    let (pool, group) = pool_addrs(pool_id);
    ix(
        verdict_markets::accounts::SetOptions {
            creator: env.actor.pubkey(),
            config: env.config,
            delegate: None,
            pool,
            group,
            collateral_mint: env.mint,
            protocol_vault,
            vault: get_associated_token_address(&group, &env.mint),
            token_program: spl_token::ID,
        },
        verdict_markets::instruction::SetOptions {
            names: option_names(),
        },
    )
}

fn cast_vote_accounts(env: &Env, pool_id: u64) -> verdict_markets::accounts::CastVote {
    let (pool, _) = pool_addrs(pool_id);
    let validator = env.actor.pubkey();
    let id = pool_id.to_le_bytes();
    verdict_markets::accounts::CastVote {
        validator,
        config: env.config,
        stake: pda(&[b"stake", validator.as_ref()]),
        pool,
        vote_record: pda(&[b"vote", id.as_ref(), validator.as_ref()]),
        system_program: system_program::ID,
    }
}

fn vote_eval_ix(env: &Env, pool_id: u64, approve: bool) -> Instruction {
    ix(
        cast_vote_accounts(env, pool_id),
        verdict_markets::instruction::VoteEvaluation { approve },
    )
}

fn vote_option_ix(env: &Env, pool_id: u64, option_index: u32) -> Instruction {
    ix(
        cast_vote_accounts(env, pool_id),
        verdict_markets::instruction::VoteOption { option_index },
    )
}

fn process_pool_ix(env: &Env, pool_id: u64) -> Instruction {
    let (pool, _) = pool_addrs(pool_id);
    ix(
        verdict_markets::accounts::ProcessPool {
            caller: env.actor.pubkey(),
            config: env.config,
            pool,
            creator_stake: pda(&[b"stake", env.actor.pubkey().as_ref()]),
        },
        verdict_markets::instruction::ProcessPool {},
    )
}

fn claim_reward_ix(env: &Env, pool_id: u64) -> Instruction {
    let (pool, _) = pool_addrs(pool_id);
    let validator = env.actor.pubkey();
    let id = pool_id.to_le_bytes();
    ix(
        verdict_markets::accounts::ClaimReward {
            validator,
            config: env.config,
            pool,
            stake: pda(&[b"stake", validator.as_ref()]),
            vote_record: pda(&[b"vote", id.as_ref(), validator.as_ref()]),
        },
        verdict_markets::instruction::ClaimReward {},
    )
}

fn position_pda(env: &Env, pool_id: u64, option_index: u32) -> Pubkey {
    let id = pool_id.to_le_bytes();
    let opt = option_index.to_le_bytes();
    pda(&[
        b"position",
        id.as_ref(),
        env.actor.pubkey().as_ref(),
        opt.as_ref(),
    ])
}

fn place_bet_ix(env: &Env, pool_id: u64, option_index: u32, amount: u64) -> Instruction {
    let (pool, group) = pool_addrs(pool_id);
    ix(
        verdict_markets::accounts::PlaceBet {
            bettor: env.actor.pubkey(),
            config: env.config,
            pool,
            group,
            position: position_pda(env, pool_id, option_index),
            collateral_mint: env.mint,
            bettor_collateral: env.actor_ata,
            vault: get_associated_token_address(&group, &env.mint),
            token_program: spl_token::ID,
            system_program: system_program::ID,
        },
        verdict_markets::instruction::PlaceBet {
            option_index,
            amount,
            min_odds: 0,
        },
    )
}

fn claim_payout_ix(env: &Env, pool_id: u64, option_index: u32) -> Instruction {
    let (pool, group) = pool_addrs(pool_id);
    ix(
        verdict_markets::accounts::ClaimPayout {
            bettor: env.actor.pubkey(),
            config: env.config,
            pool,
            group,
            position: position_pda(env, pool_id, option_index),
            collateral_mint: env.mint,
            bettor_collateral: env.actor_ata,
            treasury: env.treasury,
            treasury_collateral: env.treasury_ata,
            vault: get_associated_token_address(&group, &env.mint),
            token_program: spl_token::ID,
        },
        verdict_markets::instruction::ClaimPayout {},
    )
}

async fn group_state(env: &mut Env, pool_id: u64) -> OptionGroup {
    let (_, group) = pool_addrs(pool_id);
    let acc = env
        .ctx
        .banks_client
        .get_account(group)
        .await
        .unwrap()
        .unwrap();
    OptionGroup::try_deserialize(&mut acc.data.as_slice()).unwrap()
}

async fn stake_state(env: &mut Env) -> StakeAccount {
    let addr = pda(&[b"stake", env.actor.pubkey().as_ref()]);
    let acc = env
        .ctx
        .banks_client
        .get_account(addr)
        .await
        .unwrap()
        .unwrap();
    StakeAccount::try_deserialize(&mut acc.data.as_slice()).unwrap()
}

async fn token_balance(env: &mut Env, address: Pubkey) -> u64 {
    let acc = env
        .ctx
        .banks_client
        .get_account(address)
        .await
        .unwrap()
        .unwrap();
    spl_token::state::Account::unpack(&acc.data).unwrap().amount
}

#[tokio::test]
async fn evaluation_vote_is_once_per_validator() {
    let mut env = setup(false).await;
    let t0 = env.t0;

    let ixs = vec![
        create_pool_ix(&env, 1, t0, t0 + 10_000),
        set_options_ix(&env, 1, None),
    ];
    send(&mut env, &ixs).await.unwrap();

    advance(&mut env.ctx, t0 + 50).await;
    let vote = vote_eval_ix(&env, 1, true);
    send(&mut env, &[vote]).await.unwrap();

    advance(&mut env.ctx, t0 + 60).await;
    let again = vote_eval_ix(&env, 1, true);
    let err = send(&mut env, &[again]).await.unwrap_err();
    assert_custom(err, u32::from(VoteError::DuplicateVote));
}

#[tokio::test]
async fn votes_outside_their_window_are_rejected() {
    let mut env = setup(false).await;
    let t0 = env.t0;
    let start = t0 + 5_000;

    let ixs = vec![
        create_pool_ix(&env, 1, start, start + 10_000),
        set_options_ix(&env, 1, None),
    ];
    send(&mut env, &ixs).await.unwrap();

    // Before the evaluation window opens.
    advance(&mut env.ctx, t0 + 100).await;
    let early = vote_eval_ix(&env, 1, true);
    let err = send(&mut env, &[early]).await.unwrap_err();
    assert_custom(err, u32::from(VoteError::OutsideVotingWindow));

    // In the gap between evaluation end and option voting start.
    advance(&mut env.ctx, start + 105).await;
    let late = vote_eval_ix(&env, 1, false);
    let err = send(&mut env, &[late]).await.unwrap_err();
    assert_custom(err, u32::from(VoteError::OutsideVotingWindow));
}

#[tokio::test]
async fn reward_claim_settles_once_and_releases_the_freeze() {
    let mut env = setup(false).await;
    let t0 = env.t0;

    let ixs = vec![
        create_pool_ix(&env, 1, t0, t0 + 10_000),
        set_options_ix(&env, 1, None),
    ];
    send(&mut env, &ixs).await.unwrap();

    advance(&mut env.ctx, t0 + 50).await;
    let vote = vote_eval_ix(&env, 1, true);
    send(&mut env, &[vote]).await.unwrap();

    advance(&mut env.ctx, t0 + 150).await;
    let vote = vote_option_ix(&env, 1, 0);
    send(&mut env, &[vote]).await.unwrap();
    assert!(stake_state(&mut env).await.is_frozen());

    advance(&mut env.ctx, t0 + 320).await;
    let process = process_pool_ix(&env, 1);
    send(&mut env, &[process]).await.unwrap();

    let claim = claim_reward_ix(&env, 1);
    send(&mut env, &[claim]).await.unwrap();

    // 1_000 staked + 500 good-pool + 100 per correct vote (eval + option).
    let stake = stake_state(&mut env).await;
    assert_eq!(stake.amount, 1_700);
    assert_eq!(stake.frozen_pools, 0);

    advance(&mut env.ctx, t0 + 330).await;
    let again = claim_reward_ix(&env, 1);
    let err = send(&mut env, &[again]).await.unwrap_err();
    assert_custom(err, u32::from(ClaimRewardError::AlreadyClaimed));
}

#[tokio::test]
async fn bets_clear_without_an_evaluation_crank_and_settle_net_of_liquidity() {
    let mut env = setup(false).await;
    let t0 = env.t0;

    let ixs = vec![
        create_pool_ix(&env, 1, t0, t0 + 10_000),
        set_options_ix(&env, 1, None),
    ];
    send(&mut env, &ixs).await.unwrap();

    advance(&mut env.ctx, t0 + 50).await;
    let vote = vote_eval_ix(&env, 1, true);
    send(&mut env, &[vote]).await.unwrap();

    // Past the evaluation window, with nobody having completed it: the bet
    // itself closes the evaluation from the tallies and clears.
    advance(&mut env.ctx, t0 + 150).await;
    let bet = place_bet_ix(&env, 1, 0, 100);
    send(&mut env, &[bet]).await.unwrap();

    // First bet into the empty book seeds it evenly at par odds.
    let group = group_state(&mut env, 1).await;
    assert_eq!(group.liquidity, vec![50, 50]);
    assert!(group.bootstrapped);

    advance(&mut env.ctx, t0 + 320).await;
    let process = process_pool_ix(&env, 1);
    send(&mut env, &[process]).await.unwrap();

    let claim = claim_payout_ix(&env, 1, 0);
    send(&mut env, &[claim]).await.unwrap();

    // The gross payout left the winning option's book entry, so remaining
    // liquidity reads stay net of settlements.
    let group = group_state(&mut env, 1).await;
    assert_eq!(group.liquidity, vec![0, 50]);
    assert_eq!(group.paid_out, 100);

    // Par odds, no fees: the bettor is made exactly whole.
    let bettor_ata = env.actor_ata;
    assert_eq!(token_balance(&mut env, bettor_ata).await, 1_000_000);
    let (_, group_addr) = pool_addrs(1);
    let vault = get_associated_token_address(&group_addr, &env.mint);
    assert_eq!(token_balance(&mut env, vault).await, 0);

    advance(&mut env.ctx, t0 + 330).await;
    let again = claim_payout_ix(&env, 1, 0);
    let err = send(&mut env, &[again]).await.unwrap_err();
    assert_custom(err, u32::from(ClaimPayoutError::AlreadyClaimed));
}

#[tokio::test]
async fn bootstrap_liquidity_is_collateralized() {
    let mut env = setup(true).await;
    let t0 = env.t0;

    let protocol_vault = env.protocol_ata;
    let ixs = vec![
        create_pool_ix(&env, 1, t0, t0 + 10_000),
        set_options_ix(&env, 1, Some(protocol_vault)),
    ];
    send(&mut env, &ixs).await.unwrap();

    // Every seeded unit of the book is backed by collateral in the vault.
    let group = group_state(&mut env, 1).await;
    assert_eq!(group.liquidity, vec![100, 100]);
    assert!(group.bootstrapped);

    let (_, group_addr) = pool_addrs(1);
    let vault = get_associated_token_address(&group_addr, &env.mint);
    assert_eq!(token_balance(&mut env, vault).await, 200);
    assert_eq!(token_balance(&mut env, protocol_vault).await, 9_800);

    // Without the protocol vault the seed cannot be manufactured.
    advance(&mut env.ctx, t0 + 1).await;
    let create = create_pool_ix(&env, 2, t0 + 1, t0 + 10_000);
    send(&mut env, &[create]).await.unwrap();
    let unfunded = set_options_ix(&env, 2, None);
    let err = send(&mut env, &[unfunded]).await.unwrap_err();
    assert_custom(err, u32::from(SetOptionsError::BootstrapVaultMissing));
}
