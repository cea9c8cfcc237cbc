//! Validator set reader: projects the delegated validator set into snapshot
//! records.

use std::sync::Arc;

use genesis_export_core::{
    validate_validator_record, validate_validator_records, ExportContext, ValidatorRecord,
};
use genesis_export_store::ValidatorSetProvider;

use crate::error::ValidatorSetError;

/// Reads the delegated validator set for a snapshot.
///
/// The set comes from the delegated provider, not from local stake. Output
/// keeps provider order; nothing is re-sorted here.
pub struct ValidatorSetReader {
    provider: Arc<dyn ValidatorSetProvider>,
    validate: bool,
}

impl ValidatorSetReader {
    /// Create a reader over a provider.
    pub fn new(provider: Arc<dyn ValidatorSetProvider>, validate: bool) -> Self {
        Self { provider, validate }
    }

    /// Read and convert the full validator set.
    pub fn read(&self, ctx: &ExportContext) -> Result<Vec<ValidatorRecord>, ValidatorSetError> {
        let delegated = self
            .provider
            .all_validators(ctx)
            .map_err(ValidatorSetError::Provider)?;

        if delegated.is_empty() {
            return Err(ValidatorSetError::Empty);
        }

        let records: Vec<ValidatorRecord> = delegated.iter().map(ValidatorRecord::from).collect();

        // Address and power invariants hold regardless of configuration
        if self.validate {
            validate_validator_records(&records)?;
        } else {
            for (i, record) in records.iter().enumerate() {
                validate_validator_record(i, record)?;
            }
        }

        tracing::debug!(
            count = records.len(),
            height = ctx.height(),
            "read delegated validator set"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genesis_export_core::{ConsAddress, DelegatedValidator, ValidationError};
    use genesis_export_store::{MemoryChain, StoreError};

    fn addr(byte: u8) -> ConsAddress {
        ConsAddress::from_bytes(vec![byte; 20])
    }

    fn chain_with(validators: Vec<DelegatedValidator>) -> Arc<MemoryChain> {
        let chain = MemoryChain::at_height(100);
        chain.set_validators(validators).unwrap();
        Arc::new(chain)
    }

    struct DownProvider;

    impl ValidatorSetProvider for DownProvider {
        fn all_validators(
            &self,
            _ctx: &ExportContext,
        ) -> genesis_export_store::Result<Vec<DelegatedValidator>> {
            Err(StoreError::Unavailable("provider channel closed".into()))
        }
    }

    #[test]
    fn test_reads_in_provider_order() {
        let chain = chain_with(vec![
            DelegatedValidator::new(addr(9), 20).with_pub_key(vec![1; 32]),
            DelegatedValidator::new(addr(1), 50),
            DelegatedValidator::new(addr(5), 30),
        ]);
        let reader = ValidatorSetReader::new(chain, true);

        let records = reader.read(&ExportContext::pinned(100)).unwrap();
        let addrs: Vec<_> = records.iter().map(|r| r.address.clone()).collect();
        assert_eq!(addrs, vec![addr(9), addr(1), addr(5)]);
        assert_eq!(records.iter().map(|r| r.power).sum::<i64>(), 100);
    }

    #[test]
    fn test_empty_set_rejected() {
        let reader = ValidatorSetReader::new(chain_with(vec![]), true);
        assert!(matches!(
            reader.read(&ExportContext::pinned(100)),
            Err(ValidatorSetError::Empty)
        ));
    }

    #[test]
    fn test_provider_failure_surfaces() {
        let reader = ValidatorSetReader::new(Arc::new(DownProvider), true);
        assert!(matches!(
            reader.read(&ExportContext::pinned(100)),
            Err(ValidatorSetError::Provider(StoreError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_negative_power_rejected_in_every_mode() {
        let chain = chain_with(vec![
            DelegatedValidator::new(addr(1), 50),
            DelegatedValidator::new(addr(2), -5),
        ]);

        for validate in [true, false] {
            let reader = ValidatorSetReader::new(chain.clone(), validate);
            assert!(matches!(
                reader.read(&ExportContext::pinned(100)),
                Err(ValidatorSetError::Invalid(ValidationError::NegativePower { power: -5, .. }))
            ));
        }
    }

    #[test]
    fn test_empty_address_rejected_in_every_mode() {
        let chain = chain_with(vec![DelegatedValidator::new(
            ConsAddress::from_bytes(Vec::new()),
            10,
        )]);

        for validate in [true, false] {
            let reader = ValidatorSetReader::new(chain.clone(), validate);
            assert!(matches!(
                reader.read(&ExportContext::pinned(100)),
                Err(ValidatorSetError::Invalid(ValidationError::EmptyAddress(0)))
            ));
        }
    }

    #[test]
    fn test_lenient_mode_skips_set_checks() {
        let chain = chain_with(vec![
            DelegatedValidator::new(addr(1), 50),
            DelegatedValidator::new(addr(1), 30),
        ]);
        let lenient = ValidatorSetReader::new(chain, false);
        assert_eq!(lenient.read(&ExportContext::pinned(100)).unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let chain = chain_with(vec![
            DelegatedValidator::new(addr(1), 50),
            DelegatedValidator::new(addr(1), 30),
        ]);
        let reader = ValidatorSetReader::new(chain, true);
        assert!(matches!(
            reader.read(&ExportContext::pinned(100)),
            Err(ValidatorSetError::Invalid(ValidationError::DuplicateAddress(_)))
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_records_mirror_provider(powers in prop::collection::vec(0i64..1_000_000, 1..48)) {
                let validators: Vec<DelegatedValidator> = powers
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| DelegatedValidator::new(addr(i as u8), p))
                    .collect();
                let reader = ValidatorSetReader::new(chain_with(validators.clone()), true);

                let records = reader.read(&ExportContext::pinned(100)).unwrap();
                prop_assert_eq!(records.len(), validators.len());
                for (record, source) in records.iter().zip(&validators) {
                    prop_assert_eq!(&record.address, &source.address);
                    prop_assert_eq!(record.power, source.power);
                }
            }
        }
    }
}
