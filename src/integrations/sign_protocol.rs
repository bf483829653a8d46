use std::sync::Arc;

use async_trait::async_trait;
use ethers::{
    abi::{self, Token},
    middleware::SignerMiddleware,
    providers::{Http, Middleware, Provider},
    signers::{LocalWallet, Signer},
    types::{Address, Bytes, TransactionRequest, TxHash, U256, U64},
    utils::id,
};

use crate::{
    error::{AppError, Result},
    models::{AttestationReceipt, AttestationRequest},
    utils::strip_hex_prefix,
};

const ATTEST_SIGNATURE: &str =
    "attest((uint64,uint64,uint64,uint64,address,uint64,uint8,bool,bytes[],bytes),string,bytes,bytes)";
const DATA_LOCATION_ONCHAIN: u8 = 0;

/// Invoked once the transaction hash is known, before confirmation.
pub type TxHashHook = dyn Fn(TxHash) + Send + Sync;

/// Write path of the attestation service.
#[async_trait]
pub trait AttestationWriter: Send + Sync {
    async fn create_attestation(
        &self,
        request: &AttestationRequest,
        on_tx_hash: Option<&TxHashHook>,
    ) -> Result<AttestationReceipt>;
}

/// Parse a hex schema id such as `0xe9`.
pub fn parse_schema_id(schema_id: &str) -> Result<u64> {
    u64::from_str_radix(strip_hex_prefix(schema_id.trim()), 16)
        .map_err(|e| AppError::BadRequest(format!("Invalid schema id {}: {}", schema_id, e)))
}

/// Calldata for `attest(Attestation,string,bytes,bytes)` with the payload
/// ABI-encoded on chain.
pub fn encode_attest_calldata(attester: Address, request: &AttestationRequest) -> Result<Bytes> {
    let schema_id = parse_schema_id(&request.schema_id)?;
    let payload = abi::encode(&request.data);

    let attestation = Token::Tuple(vec![
        Token::Uint(U256::from(schema_id)),
        Token::Uint(U256::zero()), // linkedAttestationId
        Token::Uint(U256::zero()), // attestTimestamp, set by contract
        Token::Uint(U256::zero()), // revokeTimestamp
        Token::Address(attester),
        Token::Uint(U256::zero()), // validUntil
        Token::Uint(U256::from(DATA_LOCATION_ONCHAIN)),
        Token::Bool(false),
        Token::Array(vec![]),
        Token::Bytes(payload),
    ]);

    let mut calldata = id(ATTEST_SIGNATURE).to_vec();
    calldata.extend(abi::encode(&[
        attestation,
        Token::String(request.indexing_value.clone()),
        Token::Bytes(vec![]),
        Token::Bytes(vec![]),
    ]));
    Ok(Bytes::from(calldata))
}

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Submits attestations directly to the Sign Protocol contract.
pub struct SignProtocolWriter {
    client: Arc<SignerClient>,
    contract: Address,
}

impl SignProtocolWriter {
    pub fn new(rpc_url: &str, contract: &str, wallet: LocalWallet) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| AppError::BlockchainRPC(format!("Invalid RPC URL: {}", e)))?;
        let contract = contract
            .parse::<Address>()
            .map_err(|e| AppError::BadRequest(format!("Invalid contract address: {}", e)))?;
        let client = SignerMiddleware::new(provider, wallet);
        Ok(Self {
            client: Arc::new(client),
            contract,
        })
    }
}

#[async_trait]
impl AttestationWriter for SignProtocolWriter {
    async fn create_attestation(
        &self,
        request: &AttestationRequest,
        on_tx_hash: Option<&TxHashHook>,
    ) -> Result<AttestationReceipt> {
        let attester = self.client.signer().address();
        let calldata = encode_attest_calldata(attester, request)?;

        let tx = TransactionRequest::new()
            .from(attester)
            .to(self.contract)
            .data(calldata)
            .value(request.resolver_fee);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;

        let tx_hash = pending.tx_hash();
        tracing::info!("Attestation transaction submitted: {:?}", tx_hash);
        if let Some(hook) = on_tx_hash {
            hook(tx_hash);
        }

        let receipt = pending
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?
            .ok_or_else(|| {
                AppError::BlockchainRPC(format!("Transaction {:?} dropped from mempool", tx_hash))
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(AppError::BlockchainRPC(format!(
                "Transaction {:?} reverted",
                tx_hash
            )));
        }

        Ok(AttestationReceipt {
            tx_hash,
            block_number: receipt.block_number.map(|block| block.as_u64()),
        })
    }
}

/// Stand-in writer when no signing key is configured; every submission fails.
pub struct DisabledWriter;

#[async_trait]
impl AttestationWriter for DisabledWriter {
    async fn create_attestation(
        &self,
        _request: &AttestationRequest,
        _on_tx_hash: Option<&TxHashHook>,
    ) -> Result<AttestationReceipt> {
        Err(AppError::WalletUnavailable(
            "No signing key configured".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::abi::ParamType;

    fn sample_request() -> AttestationRequest {
        AttestationRequest {
            schema_id: "0xe9".to_string(),
            data: vec![Token::String("CLAIM".to_string())],
            indexing_value: "0xaaaa".to_string(),
            resolver_fee: U256::zero(),
        }
    }

    #[test]
    fn schema_id_parses_with_and_without_prefix() {
        assert_eq!(parse_schema_id("0xe9").unwrap(), 0xe9);
        assert_eq!(parse_schema_id("e9").unwrap(), 0xe9);
        assert!(parse_schema_id("0xzz").is_err());
    }

    #[test]
    fn calldata_starts_with_attest_selector() {
        let calldata = encode_attest_calldata(Address::repeat_byte(0x11), &sample_request()).unwrap();
        assert_eq!(&calldata[..4], &id(ATTEST_SIGNATURE)[..]);
    }

    #[test]
    fn calldata_carries_schema_attester_and_indexing_value() {
        let attester = Address::repeat_byte(0x11);
        let calldata = encode_attest_calldata(attester, &sample_request()).unwrap();

        let attestation_type = ParamType::Tuple(vec![
            ParamType::Uint(64),
            ParamType::Uint(64),
            ParamType::Uint(64),
            ParamType::Uint(64),
            ParamType::Address,
            ParamType::Uint(64),
            ParamType::Uint(8),
            ParamType::Bool,
            ParamType::Array(Box::new(ParamType::Bytes)),
            ParamType::Bytes,
        ]);
        let tokens = abi::decode(
            &[attestation_type, ParamType::String, ParamType::Bytes, ParamType::Bytes],
            &calldata[4..],
        )
        .unwrap();

        let Token::Tuple(fields) = &tokens[0] else {
            panic!("expected attestation tuple");
        };
        assert_eq!(fields[0], Token::Uint(U256::from(0xe9u64)));
        assert_eq!(fields[4], Token::Address(attester));
        assert_eq!(tokens[1], Token::String("0xaaaa".to_string()));
    }

    #[tokio::test]
    async fn disabled_writer_rejects_submissions() {
        let result = DisabledWriter.create_attestation(&sample_request(), None).await;
        assert!(matches!(result, Err(AppError::WalletUnavailable(_))));
    }
}
