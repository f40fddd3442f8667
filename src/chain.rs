//! Network the wallet is pointed at before any contract call.
//!
//! The structures serialize to the param shapes of `wallet_addEthereumChain`
//! (EIP-3085) and `wallet_switchEthereumChain` (EIP-3326).

use serde::{Serialize, Serializer};

pub const BASE_SEPOLIA_CHAIN_ID: u64 = 84532;
pub const BASE_SEPOLIA_RPC_URL: &str = "https://sepolia.base.org";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    #[serde(serialize_with = "serialize_chain_id")]
    pub chain_id: u64,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_explorer_urls: Option<Vec<String>>,
}

impl ChainConfig {
    pub fn base_sepolia() -> Self {
        Self {
            chain_id: BASE_SEPOLIA_CHAIN_ID,
            chain_name: "Base Sepolia Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "ETH".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![BASE_SEPOLIA_RPC_URL.to_string()],
            block_explorer_urls: None,
        }
    }

    /// Hex form used on the wire, e.g. `0x14a34`.
    pub fn hex_chain_id(&self) -> String {
        format!("{:#x}", self.chain_id)
    }

    /// Params of `wallet_switchEthereumChain` for this chain.
    pub fn switch_params(&self) -> SwitchChain {
        SwitchChain { chain_id: self.chain_id }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::base_sepolia()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChain {
    #[serde(serialize_with = "serialize_chain_id")]
    pub chain_id: u64,
}

fn serialize_chain_id<S: Serializer>(chain_id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{:#x}", chain_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_sepolia_add_chain_payload() {
        let payload = serde_json::to_value([ChainConfig::base_sepolia()]).unwrap();
        assert_eq!(
            payload,
            json!([{
                "chainId": "0x14a34",
                "chainName": "Base Sepolia Testnet",
                "nativeCurrency": { "name": "ETH", "symbol": "ETH", "decimals": 18 },
                "rpcUrls": ["https://sepolia.base.org"],
            }])
        );
    }

    #[test]
    fn switch_payload_carries_only_the_chain_id() {
        let chain = ChainConfig::default();
        assert_eq!(chain.hex_chain_id(), "0x14a34");
        assert_eq!(
            serde_json::to_value([chain.switch_params()]).unwrap(),
            json!([{ "chainId": "0x14a34" }])
        );
    }

    #[test]
    fn explorer_urls_are_sent_when_configured() {
        let mut chain = ChainConfig::base_sepolia();
        chain.block_explorer_urls = Some(vec!["https://sepolia.basescan.org".to_string()]);

        let payload = serde_json::to_value(&chain).unwrap();
        assert_eq!(payload["blockExplorerUrls"], json!(["https://sepolia.basescan.org"]));
    }
}
