use gravelkit::archetype::{generate_blocks, Archetype, Level};
use gravelkit::pipeline::write_archetype_examples;
use gravelkit::validate::{self, Severity};
use gravelkit::zwo::{parse_blocks, BlockKind, ZwoDocument};
use proptest::prelude::*;

fn archetype_strategy() -> impl Strategy<Value = Archetype> {
    (0..Archetype::ALL.len()).prop_map(|i| Archetype::ALL[i])
}

proptest! {
    #[test]
    fn blocks_are_wrapped_and_timed(archetype in archetype_strategy(), level in 1u8..=6) {
        let fragment = generate_blocks(archetype.key(), level);
        let blocks = parse_blocks(&fragment).unwrap();
        prop_assert!(blocks.len() >= 3);
        prop_assert_eq!(&blocks[0].kind, &BlockKind::Warmup);
        prop_assert_eq!(&blocks[blocks.len() - 1].kind, &BlockKind::Cooldown);

        let doc = ZwoDocument::new(archetype.workout_name(Level::new(level).unwrap()), "", blocks);
        prop_assert!(doc.duration_seconds() > 1500);
    }

    #[test]
    fn levels_outside_range_yield_nothing(archetype in archetype_strategy(), level in 7u8..) {
        prop_assert_eq!(generate_blocks(archetype.key(), level), "");
        prop_assert_eq!(generate_blocks(archetype.key(), 0), "");
    }

    #[test]
    fn generation_is_deterministic(archetype in archetype_strategy(), level in 1u8..=6) {
        prop_assert_eq!(
            generate_blocks(archetype.key(), level),
            generate_blocks(archetype.key(), level)
        );
    }
}

#[test]
fn test_examples_cover_every_archetype_and_level() {
    let dir = tempfile::tempdir().unwrap();
    let count = write_archetype_examples(dir.path(), "Gravel God Training").unwrap();
    assert_eq!(count, 114);

    let report = validate::validate_zwo_dir(dir.path()).unwrap();
    assert_eq!(report.checked, 114);
    assert_eq!(report.count(Severity::Error), 0, "{}", report.summary_table());

    let tempo = dir
        .path()
        .join(Archetype::Tempo.example_dir_name())
        .join(Archetype::Tempo.example_filename(Level::new(3).unwrap()));
    let doc = ZwoDocument::parse(&std::fs::read_to_string(tempo).unwrap()).unwrap();
    assert_eq!(doc.name, "Level 3 - Tempo");
    assert!(doc.description.contains("MAIN SET:"));
}
