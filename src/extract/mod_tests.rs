//! Tests for extension settings extraction.

use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};
use tempfile::TempDir;

use super::{
    ExtractError, ExtractionOutcome, Extractor, LegacyDecoder, Lookup, lookup_path,
    remove_typoscript_dots,
};
use crate::codec::{CodecError, yaml};
use crate::dispatch::mock::{Call, MockDispatcher};
use crate::generated::header;
use crate::paths::ProjectPaths;

/// Project layout inside a temporary directory.
struct Fixture {
    _dir: TempDir,
    paths: ProjectPaths,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let paths = ProjectPaths::new(dir.path().join("public"), dir.path());
        fs::create_dir_all(paths.local_configuration().parent().unwrap()).unwrap();
        fs::create_dir_all(paths.conf_dir()).unwrap();
        Self { _dir: dir, paths }
    }

    fn local_configuration(&self) -> PathBuf {
        self.paths.local_configuration()
    }

    fn store(&self) -> PathBuf {
        self.paths.extension_store()
    }

    fn write_legacy(&self, ext_conf: &str) {
        let content = format!(
            "<?php\nreturn [\n    'BE' => ['debug' => true],\n    'EXT' => [\n        'extConf' => [\n{ext_conf}\n        ],\n    ],\n];\n"
        );
        fs::write(self.local_configuration(), content).unwrap();
    }

    fn write_store(&self, content: &str) {
        fs::write(self.store(), content).unwrap();
    }

    fn read_store(&self) -> Value {
        yaml::parse(&fs::read_to_string(self.store()).unwrap()).unwrap()
    }
}

/// Decodes legacy settings written as JSON.
struct JsonDecoder;

impl LegacyDecoder for JsonDecoder {
    fn decode(&self, raw: &str) -> Result<Value, CodecError> {
        serde_json::from_str(raw).map_err(|e| CodecError::literal(0, e.to_string()))
    }
}

mod skipping {
    use super::*;

    #[test]
    fn missing_file_has_nothing_to_extract() {
        let fixture = Fixture::new();
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(outcome, ExtractionOutcome::NoFileToExtract);
        assert!(dispatcher.calls().is_empty());
        assert!(!fixture.store().exists());
    }

    #[test]
    fn generated_file_is_left_alone() {
        let fixture = Fixture::new();
        fs::write(
            fixture.local_configuration(),
            format!("{}return [];\n", header()),
        )
        .unwrap();
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(outcome, ExtractionOutcome::AlreadyGenerated);
        assert!(dispatcher.calls().is_empty());
    }

    #[test]
    fn missing_extension_settings_are_nothing_found() {
        let fixture = Fixture::new();
        fs::write(
            fixture.local_configuration(),
            "<?php\nreturn ['BE' => ['debug' => true]];\n",
        )
        .unwrap();
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(outcome, ExtractionOutcome::NothingFound);
        assert!(dispatcher.calls().is_empty());
        assert!(!fixture.store().exists());
    }

    #[test]
    fn non_mapping_ext_conf_is_nothing_found() {
        let fixture = Fixture::new();
        fs::write(
            fixture.local_configuration(),
            "<?php\nreturn ['EXT' => ['extConf' => 'legacy']];\n",
        )
        .unwrap();
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(outcome, ExtractionOutcome::NothingFound);
    }
}

mod extracting {
    use super::*;

    #[test]
    fn writes_new_store_and_removes_settings() {
        let fixture = Fixture::new();
        fixture.write_legacy(
            r#"            'news' => 'a:2:{s:7:"archive";s:4:"date";s:8:"storage.";a:1:{s:4:"path";s:2:"/x";}}',"#,
        );
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(
            outcome,
            ExtractionOutcome::Extracted {
                extensions: vec!["news".to_string()]
            }
        );
        assert_eq!(
            fs::read_to_string(fixture.store()).unwrap(),
            "EXT:\n    extConf:\n        news:\n            archive: date\n            storage:\n                path: /x\n"
        );
        assert_eq!(
            dispatcher.calls(),
            [Call::RemoveConfiguration {
                paths: vec!["EXT".to_string()],
                force: true,
            }]
        );
    }

    #[test]
    fn store_with_non_printable_values_reads_back() {
        let fixture = Fixture::new();
        fixture.write_legacy(
            "            'ext' => 'a:2:{s:3:\"del\";s:3:\"a\u{7f}b\";s:3:\"sep\";s:5:\"x\u{2028}y\";}',",
        );
        let dispatcher = MockDispatcher::new();
        let extractor = Extractor::for_project(&fixture.paths, &dispatcher);

        extractor.extract().unwrap();
        // The mock leaves the legacy file in place, so this run re-reads the store
        extractor.extract().unwrap();

        assert_eq!(
            fixture.read_store(),
            json!({"EXT": {"extConf": {"ext": {"del": "a\u{7f}b", "sep": "x\u{2028}y"}}}})
        );
    }

    #[test]
    fn preserves_unrelated_extension_keys() {
        let fixture = Fixture::new();
        fixture.write_store("EXT:\n    extConf:\n        A: { x: 1 }\n        B: { y: 2 }\n");
        fixture.write_legacy(r#"            'A' => 'a:2:{s:1:"x";i:2;s:1:"z";i:3;}',"#);
        let dispatcher = MockDispatcher::new();

        Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(
            fixture.read_store(),
            json!({"EXT": {"extConf": {"A": {"x": 2, "z": 3}, "B": {"y": 2}}}})
        );
    }

    #[test]
    fn keeps_other_store_content_and_order() {
        let fixture = Fixture::new();
        fixture.write_store("SYS:\n    sitename: Kept\nEXT:\n    extConf:\n        B: { y: 2 }\n");
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let dispatcher = MockDispatcher::new();

        Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        let store = fixture.read_store();
        assert_eq!(store["SYS"], json!({"sitename": "Kept"}));
        let extensions: Vec<&String> = store["EXT"]["extConf"].as_object().unwrap().keys().collect();
        assert_eq!(extensions, ["B", "A"]);
    }

    #[test]
    fn replaces_non_mapping_store_entry() {
        let fixture = Fixture::new();
        fixture.write_store("EXT:\n    extConf:\n        A: legacy\n");
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let dispatcher = MockDispatcher::new();

        Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(fixture.read_store(), json!({"EXT": {"extConf": {"A": {"x": 1}}}}));
    }

    #[test]
    fn mapping_values_are_used_as_is_without_dots() {
        let fixture = Fixture::new();
        fixture.write_legacy("            'A' => ['feature.' => ['enabled' => '1']],");
        let dispatcher = MockDispatcher::new();

        Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(
            fixture.read_store(),
            json!({"EXT": {"extConf": {"A": {"feature": {"enabled": "1"}}}}})
        );
    }

    #[test]
    fn empty_ext_conf_still_removes_settings() {
        let fixture = Fixture::new();
        fixture.write_legacy("");
        let dispatcher = MockDispatcher::new();

        let outcome = Extractor::for_project(&fixture.paths, &dispatcher)
            .extract()
            .unwrap();

        assert_eq!(outcome, ExtractionOutcome::Extracted { extensions: vec![] });
        assert_eq!(dispatcher.calls().len(), 1);
    }

    #[test]
    fn custom_decoder() {
        let fixture = Fixture::new();
        fixture.write_legacy(r#"            'A' => '{"mode": "strict"}',"#);
        let dispatcher = MockDispatcher::new();

        Extractor::for_project(&fixture.paths, &dispatcher)
            .with_decoder(JsonDecoder)
            .extract()
            .unwrap();

        assert_eq!(
            fixture.read_store(),
            json!({"EXT": {"extConf": {"A": {"mode": "strict"}}}})
        );
    }

    #[test]
    fn explicit_locations() {
        let fixture = Fixture::new();
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let store = fixture.paths.conf_dir().join("custom.yml");
        let dispatcher = MockDispatcher::new();

        Extractor::new(fixture.local_configuration(), &store, &dispatcher)
            .extract()
            .unwrap();

        assert!(store.exists());
        assert!(!fixture.store().exists());
    }
}

mod failures {
    use super::*;

    #[test]
    fn store_is_written_before_failing_removal() {
        let fixture = Fixture::new();
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let dispatcher = MockDispatcher::new().failing_removal();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(result, Err(ExtractError::Remove(_))));
        assert_eq!(fixture.read_store(), json!({"EXT": {"extConf": {"A": {"x": 1}}}}));
    }

    #[test]
    fn decode_failure_writes_nothing() {
        let fixture = Fixture::new();
        fixture.write_store("EXT:\n    extConf:\n        B: { y: 2 }\n");
        fixture.write_legacy(
            "            'A' => 'a:1:{s:1:\"x\";i:1;}',\n            'broken' => 'not serialized',",
        );
        let before = fs::read_to_string(fixture.store()).unwrap();
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        match result {
            Err(ExtractError::LegacyDecode { extension, .. }) => assert_eq!(extension, "broken"),
            other => panic!("Expected LegacyDecode, got {other:?}"),
        }
        assert_eq!(fs::read_to_string(fixture.store()).unwrap(), before);
        assert!(dispatcher.calls().is_empty());
    }

    #[test]
    fn scalar_legacy_value_is_unsupported() {
        let fixture = Fixture::new();
        fixture.write_legacy("            'A' => 42,");
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(
            result,
            Err(ExtractError::UnsupportedLegacyValue { kind: "a number", .. })
        ));
        assert!(!fixture.store().exists());
    }

    #[test]
    fn decoded_scalar_is_unsupported() {
        let fixture = Fixture::new();
        fixture.write_legacy(r#"            'A' => 's:3:"foo";',"#);
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(
            result,
            Err(ExtractError::UnsupportedLegacyValue { kind: "a string", .. })
        ));
    }

    #[test]
    fn malformed_store_is_fatal() {
        let fixture = Fixture::new();
        fixture.write_store("EXT: [unclosed\n");
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(result, Err(ExtractError::Store { .. })));
        assert!(dispatcher.calls().is_empty());
    }

    #[test]
    fn store_must_be_a_mapping() {
        let fixture = Fixture::new();
        fixture.write_store("- a\n");
        fixture.write_legacy(r#"            'A' => 'a:1:{s:1:"x";i:1;}',"#);
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(result, Err(ExtractError::StoreNotMapping { .. })));
    }

    #[test]
    fn unparsable_generated_file_is_fatal() {
        let fixture = Fixture::new();
        fs::write(
            fixture.local_configuration(),
            "<?php\nreturn ['path' => getenv('HOME')];\n",
        )
        .unwrap();
        let dispatcher = MockDispatcher::new();

        let result = Extractor::for_project(&fixture.paths, &dispatcher).extract();

        assert!(matches!(result, Err(ExtractError::Blob { .. })));
    }
}

mod legacy {
    use super::*;

    #[test]
    fn removes_dots_from_nested_keys_only() {
        let value = json!({
            "plain.": "scalar keeps its dot",
            "nested.": {"deeper.": {"x": 1}, "y": 2},
        });
        assert_eq!(
            remove_typoscript_dots(value),
            json!({
                "plain.": "scalar keeps its dot",
                "nested": {"deeper": {"x": 1}, "y": 2},
            })
        );
    }

    #[test]
    fn stripped_key_collision_keeps_first_position() {
        let value = json!({"a": "scalar", "b": 1, "a.": {"x": 1}});
        let stripped = remove_typoscript_dots(value);
        assert_eq!(stripped, json!({"a": {"x": 1}, "b": 1}));
        assert_eq!(stripped.as_object().unwrap().keys().next().unwrap(), "a");
    }

    #[test]
    fn lookup_finds_nested_path() {
        let value = json!({"EXT": {"extConf": {"news": "x"}}});
        assert_eq!(
            lookup_path(&value, "EXT/extConf"),
            Lookup::Found(&json!({"news": "x"}))
        );
    }

    #[test]
    fn lookup_reports_missing_segment() {
        let value = json!({"EXT": {"other": 1}});
        assert_eq!(lookup_path(&value, "EXT/extConf"), Lookup::NotFound);
        assert_eq!(lookup_path(&json!("scalar"), "EXT"), Lookup::NotFound);
    }

    #[test]
    fn lookup_indexes_sequences() {
        let value = json!({"list": ["a", "b"]});
        assert_eq!(lookup_path(&value, "list/1"), Lookup::Found(&json!("b")));
        assert_eq!(lookup_path(&value, "list/2"), Lookup::NotFound);
    }
}
