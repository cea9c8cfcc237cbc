//! Property tests over generated chains.

use proptest::prelude::*;

use genesis_export::store::StoreError;
use genesis_export::{ExportConfig, ExportError};
use genesis_export_testkit::generators::{
    distinct, module, module_subset, validator_set, ChainParams,
};
use genesis_export_testkit::ChainFixture;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_export_height_follows_commit(params: ChainParams) {
        let fixture = params.build();
        let exported = fixture
            .coordinator(ExportConfig::propagating())
            .export(false, &[], &[])
            .unwrap();

        prop_assert_eq!(exported.height, params.height + 1);
        prop_assert_eq!(exported.validators.len(), params.powers.len());
        prop_assert_eq!(exported.total_power(), params.total_power());
    }

    #[test]
    fn test_export_is_idempotent(params: ChainParams) {
        let fixture = params.build();
        let exporter = fixture.coordinator(ExportConfig::propagating());

        let a = exporter.export(false, &[], &[]).unwrap();
        let b = exporter.export(false, &[], &[]).unwrap();

        prop_assert_eq!(&a.app_state, &b.app_state);
        prop_assert_eq!(a.app_state_digest(), b.app_state_digest());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn test_zero_height_resets_every_record(params: ChainParams) {
        let fixture = params.build();
        let exported = fixture
            .coordinator(ExportConfig::propagating())
            .export(true, &[], &[])
            .unwrap();

        prop_assert_eq!(exported.height, 0);
        let infos = fixture.signing_infos();
        prop_assert_eq!(infos.len(), params.powers.len());
        prop_assert!(infos.iter().all(|i| i.start_height == 0));
        prop_assert_eq!(
            fixture.chain.signing_info_writes().unwrap(),
            params.powers.len() as u64
        );
    }

    #[test]
    fn test_selection_exports_exactly_the_selected(
        (params, selection) in any::<ChainParams>().prop_flat_map(|params| {
            let names = params.build().module_names();
            (Just(params), module_subset(names))
        })
    ) {
        let fixture = params.build();
        let exported = fixture
            .coordinator(ExportConfig::propagating())
            .export(false, &[], &selection)
            .unwrap();

        let doc = exported.app_state_document().unwrap();
        let exported_names: Vec<_> = doc.keys().cloned().collect();
        let expected: Vec<_> = distinct(&selection).into_iter().collect();
        prop_assert_eq!(exported_names, expected);
    }

    #[test]
    fn test_unregistered_module_fails_whole_export(
        params in any::<ChainParams>(),
        extra in module(),
    ) {
        let fixture = params.build();
        prop_assume!(!fixture.module_names().contains(&extra));

        let mut selection = fixture.module_names();
        selection.push(extra.clone());
        let err = fixture
            .coordinator(ExportConfig::propagating())
            .export(false, &[], &selection)
            .unwrap_err();

        match err {
            ExportError::Aggregation(StoreError::UnknownModule(name)) => prop_assert_eq!(name, extra),
            other => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn test_empty_selection_exports_everything(params: ChainParams) {
        let fixture = params.build();
        let exported = fixture
            .coordinator(ExportConfig::propagating())
            .export(false, &[], &[])
            .unwrap();

        let doc = exported.app_state_document().unwrap();
        prop_assert_eq!(doc.len(), fixture.module_names().len());
    }

    #[test]
    fn test_validator_records_mirror_provider(set in validator_set(24)) {
        let fixture = ChainFixture::builder().powers(&[]).build();
        fixture.chain.set_validators(set.clone()).unwrap();

        let exported = fixture
            .coordinator(ExportConfig::propagating())
            .export(false, &[], &[])
            .unwrap();

        prop_assert_eq!(exported.validators.len(), set.len());
        for (record, source) in exported.validators.iter().zip(set.iter()) {
            prop_assert_eq!(&record.address, &source.address);
            prop_assert_eq!(record.power, source.power);
        }
    }
}
