pub mod battle_oracle;
pub mod sign_protocol;
pub mod wallet;

pub use battle_oracle::{BattleOracle, HttpBattleOracle};
pub use sign_protocol::{AttestationWriter, SignProtocolWriter, TxHashHook};
pub use wallet::{IdentityProvider, LocalWalletIdentity};
