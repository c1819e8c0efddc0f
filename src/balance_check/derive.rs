use alloy::signers::local::{coins_bip39::English, LocalSignerError, MnemonicBuilder};
use itertools::Itertools;
use thiserror::Error;

/// Standard Ethereum derivation path, first account of the first wallet.
pub const DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

#[derive(Debug, Error)]
pub enum DerivationError {
    #[error("mnemonic is empty")]
    EmptyMnemonic,
    #[error("failed to create wallet from mnemonic: {0}")]
    InvalidMnemonic(#[source] LocalSignerError),
    #[error("failed to derive account at m/44'/60'/0'/0/0: {0}")]
    InvalidPath(#[source] LocalSignerError),
}

/// Derives the EIP-55 checksummed address of the account at [`DERIVATION_PATH`] for a BIP39
/// English mnemonic with an empty passphrase.
pub fn derive_address(mnemonic: &str) -> Result<String, DerivationError> {
    let phrase = mnemonic.split_whitespace().join(" ");
    if phrase.is_empty() {
        return Err(DerivationError::EmptyMnemonic);
    }

    let signer = MnemonicBuilder::<English>::default()
        .phrase(phrase)
        .derivation_path(DERIVATION_PATH)
        .map_err(DerivationError::InvalidPath)?
        .build()
        .map_err(DerivationError::InvalidMnemonic)?;

    Ok(signer.address().to_checksum(None))
}
