/// Application constants

// Sign Protocol schema (Arbitrum Sepolia)
pub const INDEX_SCHEMA_ID: &str = "onchain_evm_421614_0xe9";
pub const ATTESTATION_SCHEMA_ID: &str = "0xe9";
pub const ATTESTATION_MODE_ONCHAIN: &str = "onchain";
pub const SIGN_INDEX_TESTNET_URL: &str = "https://testnet-rpc.sign.global/api";
pub const SIGN_PROTOCOL_ARBITRUM_SEPOLIA: &str = "0x4e4af2a21ebf62850fD99Eb6253E1eFBb56098cD";
pub const ARBITRUM_SEPOLIA_CHAIN_ID: u64 = 421614;

// Attestation payload layout (positions in the schema tuple)
pub const FIELD_BATTLE_ID: usize = 1;
pub const FIELD_MEME_ID: usize = 2;
pub const FIELD_BET_AMOUNT: usize = 3;
pub const FIELD_BET_TIMESTAMP: usize = 4;
pub const FIELD_ACTION: usize = 6;

// Action tags
pub const ACTION_CLAIM: &str = "CLAIM";

// Battle oracle
pub const BATTLE_STATUS_ENDED: &str = "ended";

// Amounts
pub const ETHER_DECIMALS: u32 = 18;

// Toast messages
pub const MSG_NO_WALLET: &str = "No wallet connected. Please connect your wallet and try again.";
pub const MSG_CLAIM_STARTED: &str = "Creating claim attestation...";
pub const MSG_CLAIM_SUCCEEDED: &str = "Claim attestation created successfully!";
pub const MSG_CLAIM_FAILED: &str = "Error creating claim attestation. Please try again.";

// API version
pub const API_VERSION: &str = "v1";

// WebSocket configuration
pub const WS_HEARTBEAT_INTERVAL_SECS: u64 = 30;
pub const WS_CLIENT_TIMEOUT_SECS: u64 = 60;
pub const NOTIFICATION_CHANNEL_CAPACITY: usize = 100;

// Outbound HTTP
pub const HTTP_TIMEOUT_SECS: u64 = 15;
