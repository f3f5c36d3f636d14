use super::*;
use crate::test_support::{grid_pdf, write_grid_pdf};

fn scenario() -> (OccurrenceTable, SourceDocument, GridGeometry) {
    let table = OccurrenceTable::from_rows(vec![[1, 0, 0, 0], [0, 1, 0, 0]]).unwrap();
    let source = SourceDocument::from_document(grid_pdf(2, 10, 180));
    let grid = source.grid(VERTICAL_CELLS, PADDING_FRACTION).unwrap();
    (table, source, grid)
}

fn out_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn default_config_reproduces_worksheet_constants() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg.input, PathBuf::from("counting-wo-shi-hen-ni.pdf"));
    assert_eq!(cfg.out_dir, PathBuf::from("."));
    assert_eq!(cfg.vertical_cells, 18);
    assert_eq!(cfg.padding_fraction, 0.1);
    assert_eq!(cfg.dpi, 500);
    assert_eq!(cfg.fps, 10);
    assert_eq!(cfg.codec, "mpeg4");
    assert_eq!(cfg.bar_thickness, 11);
    assert!(cfg.overwrite);
    assert!(!cfg.parallel);
    assert!(cfg.validate().is_ok());
}

#[test]
fn config_validation_catches_bad_values() {
    let base = PipelineConfig::default();
    for bad in [
        PipelineConfig {
            vertical_cells: 0,
            ..base.clone()
        },
        PipelineConfig {
            padding_fraction: 0.5,
            ..base.clone()
        },
        PipelineConfig {
            padding_fraction: -0.1,
            ..base.clone()
        },
        PipelineConfig {
            dpi: 0,
            ..base.clone()
        },
        PipelineConfig {
            fps: 0,
            ..base.clone()
        },
    ] {
        assert!(bad.validate().is_err(), "{bad:?}");
    }
}

#[test]
fn encode_config_points_at_saved_frames() {
    let cfg = PipelineConfig {
        out_dir: PathBuf::from("out"),
        ..PipelineConfig::default()
    };
    let enc = cfg.encode_config(Target::Wo, 64);
    assert_eq!(enc.input_pattern, PathBuf::from("out/wo.%02d.png"));
    assert_eq!(enc.out_path, PathBuf::from("out/wo.mp4"));
    assert_eq!(enc.fps, 10);
    assert_eq!(enc.start_number, 0);
}

#[test]
fn extract_stage_writes_one_pdf_per_present_target() {
    let (table, source, grid) = scenario();
    let dir = out_dir("unit_pipeline_extract");
    let cfg = PipelineConfig {
        out_dir: dir.clone(),
        ..PipelineConfig::default()
    };

    let summary = run_loaded(&cfg, &table, &source, &grid, Stage::Extract).unwrap();
    assert_eq!(summary.source_pages, 2);
    assert_eq!(summary.vertical_cells, 18);
    assert_eq!(summary.horizontal_cells, 1.0);

    let by_target: Vec<_> = summary
        .targets
        .iter()
        .map(|t| (t.target, t.pages_written, t.skipped))
        .collect();
    assert_eq!(
        by_target,
        vec![
            (Target::Wo, 1, false),
            (Target::Shi, 1, false),
            (Target::Hen, 0, true),
            (Target::Ni, 0, true),
        ]
    );

    assert!(dir.join("wo.pdf").exists());
    assert!(dir.join("shi.pdf").exists());
    assert!(!dir.join("hen.pdf").exists());
    assert!(!dir.join("ni.pdf").exists());
    assert!(summary.targets.iter().all(|t| t.video_path.is_none()));
}

#[test]
fn parallel_run_matches_sequential_run() {
    let (table, source, grid) = scenario();
    let seq_cfg = PipelineConfig {
        out_dir: out_dir("unit_pipeline_seq"),
        ..PipelineConfig::default()
    };
    let par_cfg = PipelineConfig {
        out_dir: out_dir("unit_pipeline_par"),
        parallel: true,
        ..PipelineConfig::default()
    };

    let seq = run_loaded(&seq_cfg, &table, &source, &grid, Stage::Extract).unwrap();
    let par = run_loaded(&par_cfg, &table, &source, &grid, Stage::Extract).unwrap();
    let strip = |s: &RunSummary| -> Vec<(Target, usize, bool)> {
        s.targets
            .iter()
            .map(|t| (t.target, t.pages_written, t.skipped))
            .collect()
    };
    assert_eq!(strip(&seq), strip(&par));
}

#[test]
fn table_longer_than_document_is_rejected_up_front() {
    let table = OccurrenceTable::from_rows(vec![[0, 0, 0, 0]; 3]).unwrap();
    let source = SourceDocument::from_document(grid_pdf(2, 100, 180));
    let grid = source.grid(18, 0.1).unwrap();
    let cfg = PipelineConfig {
        out_dir: out_dir("unit_pipeline_short"),
        ..PipelineConfig::default()
    };
    let err = run_loaded(&cfg, &table, &source, &grid, Stage::Extract).unwrap_err();
    assert!(matches!(err, GlyphreelError::Validation(_)));
}

#[test]
fn run_loads_the_configured_input() {
    let dir = out_dir("unit_pipeline_run");
    let input = dir.join("sheet.pdf");
    write_grid_pdf(&input, 2, 10, 180);
    let (table, _, _) = scenario();

    let cfg = PipelineConfig {
        input,
        out_dir: dir.clone(),
        ..PipelineConfig::default()
    };
    let summary = run(&cfg, &table, Stage::Extract).unwrap();
    assert_eq!(summary.totals.wo, 1);
    assert_eq!(summary.totals.shi, 1);
    assert!(dir.join("wo.pdf").exists());
}

#[test]
fn missing_input_is_a_document_error() {
    let cfg = PipelineConfig {
        input: PathBuf::from("target/unit_pipeline_missing/none.pdf"),
        ..PipelineConfig::default()
    };
    let err = run(&cfg, &OccurrenceTable::worksheet(), Stage::Extract).unwrap_err();
    assert!(matches!(err, GlyphreelError::Document(_)));
}
