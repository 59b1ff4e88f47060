//! End-to-end pipeline: identifier split → archive join → table generation.

mod fixture;

use std::fs;
use std::path::{Path, PathBuf};

use remapkit::channel::{resolve_all, MappingKey};
use remapkit::generate::{self, GenerateRequest};
use remapkit::join::join_or_first;
use remapkit::table::{Format, MappingFile};

use fixture::{read_entry, write_zip};

const BASE_TSRG: &str = "\
a/b net/srg/C_1_
\tf1 field_1_a
\tm1 (La/b;)V func_2_b
";

fn seed_resolved_archives(dir: &Path) -> (PathBuf, PathBuf) {
    let official = dir.join("official-1.20.1.zip");
    let snapshot = dir.join("snapshot-20230602-1.20.1.zip");
    write_zip(&official, &[], &[("mappings.tsrg", BASE_TSRG)]);
    write_zip(
        &snapshot,
        &[],
        &[
            ("fields.csv", "searge,name,side\nfield_1_a,maxHealth,0\n"),
            ("methods.csv", "searge,name,side\nfunc_2_b,tick,0\n"),
            ("params.csv", "param,name,side\np_3_c_,entity,0\n"),
        ],
    );
    (official, snapshot)
}

#[test]
fn merged_identifier_drives_the_whole_pipeline() {
    let dir = tempfile::tempdir().unwrap();

    // Split the merged identifier into its two namespace keys.
    let key = MappingKey::parse("official_snapshot_20230602-1.20.1").unwrap();
    let keys = key.split();
    assert_eq!(
        keys,
        vec![
            MappingKey::new("official", "1.20.1"),
            MappingKey::new("snapshot", "20230602-1.20.1"),
        ]
    );

    // "Resolve" each key to a local archive, the download layer's job.
    let (official, snapshot) = seed_resolved_archives(dir.path());
    let resolved = resolve_all(&key.channel, &key.version, |channel, _version| {
        match channel {
            "official" => official.clone(),
            _ => snapshot.clone(),
        }
    });
    assert_eq!(resolved.len(), 2);

    // Join the archives for the external rewriter.
    let joined = join_or_first(&resolved);
    assert_eq!(joined, dir.path().join("official-1.20.1-joined.zip"));
    assert_eq!(read_entry(&joined, "mappings.tsrg"), BASE_TSRG);
    assert!(read_entry(&joined, "params.csv").contains("entity"));

    // Generate the member-renaming table from the secondary archive.
    let srg = dir.path().join("joined.tsrg");
    fs::write(&srg, BASE_TSRG).unwrap();
    let request = GenerateRequest {
        srg,
        names: vec![snapshot],
        output: dir.path().join("build/output.tsrg"),
        format: Format::Tsrg,
        reverse: false,
        obfuscated: false,
    };
    generate::run(&request).unwrap();

    let table = MappingFile::load(&request.output).unwrap();
    let class = table.find_class("net/srg/C_1_").unwrap();
    assert_eq!(class.srg, "net/srg/C_1_");
    assert_eq!(class.fields[0].obf, "field_1_a");
    assert_eq!(class.fields[0].srg, "maxHealth");
    assert_eq!(class.methods[0].srg, "tick");
}

#[test]
fn non_merged_identifier_needs_no_join() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("snapshot.zip");
    write_zip(
        &archive,
        &[],
        &[("methods.csv", "searge,name,side\nfunc_2_b,tick,0\n")],
    );

    let keys = MappingKey::parse("snapshot_20210309-1.16.5").unwrap().split();
    assert_eq!(keys.len(), 1);

    let resolved = vec![archive.clone()];
    // Single archive: passthrough, nothing derived on disk.
    assert_eq!(join_or_first(&resolved), archive);
    assert!(!dir.path().join("snapshot-joined.zip").exists());
}

#[test]
fn generate_reversed_srg_output() {
    let dir = tempfile::tempdir().unwrap();
    let (_, snapshot) = seed_resolved_archives(dir.path());
    let srg = dir.path().join("joined.tsrg");
    fs::write(&srg, BASE_TSRG).unwrap();

    let request = GenerateRequest {
        srg,
        names: vec![snapshot],
        output: dir.path().join("output.srg"),
        format: Format::Srg,
        reverse: true,
        obfuscated: false,
    };
    generate::run(&request).unwrap();

    let content = fs::read_to_string(&request.output).unwrap();
    // Reversed: readable names on the source side, srg on the target side.
    assert!(content.contains("FD: net/srg/C_1_/maxHealth net/srg/C_1_/field_1_a"));
    assert!(content.contains("MD: net/srg/C_1_/tick"));
}
