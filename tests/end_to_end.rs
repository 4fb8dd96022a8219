use std::fs;
use std::path::Path;

use saldo_animacy::config::Config;
use saldo_animacy::parsing::record_tsv::read_sampler_input;
use saldo_animacy::pipeline::{run_join, run_sample, JoinArgs, SampleArgs};
use saldo_animacy::report_io::load_sampling_report;
use saldo_animacy::sampling::allocation::desired_per_bin;
use saldo_animacy::Animacy;

fn entry(form: &str, lemgram: &str, sense: &str, parent: Option<&str>) -> String {
    let relation = parent
        .map(|p| {
            format!(
                r#"<SenseRelation targets="{}"><feat att="label" val="primary"/></SenseRelation>"#,
                p
            )
        })
        .unwrap_or_default();
    format!(
        r#"<LexicalEntry>
  <Lemma><FormRepresentation>
    <feat att="writtenForm" val="{form}"/>
    <feat att="partOfSpeech" val="nn"/>
    <feat att="lemgram" val="{lemgram}"/>
  </FormRepresentation></Lemma>
  <Sense id="{sense}">{relation}</Sense>
</LexicalEntry>"#
    )
}

fn write_lexicon(path: &Path) {
    let body = [
        entry("person", "person..1", "person..1", None),
        entry("son", "son..1", "son..1", Some("person..1")),
        entry("sten", "sten..1", "sten..1", None),
    ]
    .join("\n");
    fs::write(
        path,
        format!("<LexicalResource><Lexicon>{}</Lexicon></LexicalResource>", body),
    )
    .unwrap();
}

#[test]
fn join_produces_the_documented_rows() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = dir.path().join("saldo.xml");
    let stats = dir.path().join("stats.txt");
    write_lexicon(&lexicon);
    fs::write(&stats, "son\tNN\tson..1\t-\t100\nsten\tNN\tsten..1\t-\t50\n").unwrap();

    let args = JoinArgs {
        saldo_xml: lexicon,
        stats,
        out: dir.path().join("joined.tsv"),
        unmatched: dir.path().join("unmatched.txt"),
    };
    let summary = run_join(&Config::default(), &args).unwrap();

    let joined = fs::read_to_string(&args.out).unwrap();
    assert_eq!(
        joined,
        "writtenForm\tlemgram\tfrequency\tanimacy\tpath\n\
son\tson..1\t100\tanimate\tson → person\n\
sten\tsten..1\t50\tinanimate\tsten\n"
    );
    assert_eq!(fs::read_to_string(&args.unmatched).unwrap(), "");
    assert_eq!(summary.animate, 1);
    assert_eq!(summary.inanimate, 1);
    assert_eq!(summary.unmatched, 0);
}

#[test]
fn join_reports_lemgrams_missing_from_the_lexicon() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = dir.path().join("saldo.xml");
    let stats = dir.path().join("stats.txt");
    write_lexicon(&lexicon);
    fs::write(
        &stats,
        "son\tNN\t|son..1|\t-\t100\nval\tNN\tval..nn.1\t-\t70\nöga\tNN\töga..nn.1\t-\t70\n",
    )
    .unwrap();

    let args = JoinArgs {
        saldo_xml: lexicon,
        stats,
        out: dir.path().join("joined.tsv"),
        unmatched: dir.path().join("unmatched.txt"),
    };
    run_join(&Config::default(), &args).unwrap();

    let joined = fs::read_to_string(&args.out).unwrap();
    let rows: Vec<&str> = joined.lines().skip(1).collect();
    assert_eq!(rows[1], "val\tval..nn.1\t70\tunknown\t");
    assert_eq!(rows[2], "öga\töga..nn.1\t70\tunknown\t");
    assert_eq!(
        fs::read_to_string(&args.unmatched).unwrap(),
        "val..nn.1\nöga..nn.1"
    );
}

#[test]
fn entry_without_sense_ids_is_reported_unmatched() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = dir.path().join("saldo.xml");
    let stats = dir.path().join("stats.txt");
    fs::write(
        &lexicon,
        r#"<LexicalResource><Lexicon><LexicalEntry>
  <Lemma><FormRepresentation>
    <feat att="writtenForm" val="val"/>
    <feat att="partOfSpeech" val="nn"/>
    <feat att="lemgram" val="val..nn.1"/>
  </FormRepresentation></Lemma>
  <Sense/>
</LexicalEntry></Lexicon></LexicalResource>"#,
    )
    .unwrap();
    fs::write(&stats, "val\tNN\tval..nn.1\t-\t7\n").unwrap();

    let args = JoinArgs {
        saldo_xml: lexicon,
        stats,
        out: dir.path().join("joined.tsv"),
        unmatched: dir.path().join("unmatched.txt"),
    };
    let summary = run_join(&Config::default(), &args).unwrap();
    assert_eq!(summary.unmatched, 1);
    assert_eq!(fs::read_to_string(&args.unmatched).unwrap(), "val..nn.1");
    assert_eq!(
        fs::read_to_string(&args.out).unwrap().lines().nth(1),
        Some("val\tval..nn.1\t7\tunknown\t")
    );
}

#[test]
fn failed_join_write_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let lexicon = dir.path().join("saldo.xml");
    let stats = dir.path().join("stats.txt");
    write_lexicon(&lexicon);
    fs::write(&stats, "son\tNN\tson..1\t-\t100\n").unwrap();

    let args = JoinArgs {
        saldo_xml: lexicon,
        stats,
        out: dir.path().join("joined.tsv"),
        unmatched: dir.path().join("no_such_dir").join("unmatched.txt"),
    };
    assert!(run_join(&Config::default(), &args).is_err());
    assert!(!args.out.exists());
}

#[test]
fn sampling_mirrors_combined_bin_proportions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("joined.tsv");
    let mut text = String::from("writtenForm\tlemgram\tfrequency\tanimacy\tpath\n");
    for (label, tag) in [("animate", "a"), ("inanimate", "i")] {
        for decade in 0..4u32 {
            for k in 0..5u64 {
                let frequency = 10u64.pow(decade) * (2 + k);
                text.push_str(&format!(
                    "{tag}{decade}{k}\t{tag}{decade}{k}..nn.1\t{frequency}\t{label}\t\n"
                ));
            }
        }
    }
    text.push_str("okänd\tokänd..nn.1\t500\tunknown\t\n");
    fs::write(&input, text).unwrap();

    let prefix = dir.path().join("sampled").to_string_lossy().into_owned();
    let report_path = dir.path().join("report.json");
    let args = SampleArgs {
        tsv: input,
        n: 5,
        bins: 4,
        seed: 42,
        out_prefix: prefix,
        report: Some(report_path.clone()),
    };
    let summary = run_sample(&args).unwrap();
    assert_eq!(summary.input.unknown_label, 1);
    assert_eq!(summary.effective_bins, 4);
    assert_eq!((summary.animate, summary.inanimate), (5, 5));

    let report = load_sampling_report(&report_path).unwrap();
    let expected = desired_per_bin(&report.combined_per_bin, 5);
    assert_eq!(report.desired_per_bin, expected);
    for class in &report.classes {
        assert_eq!(class.sampled_per_bin, expected);
    }

    for (path, label) in [
        (&summary.animate_path, Animacy::Animate),
        (&summary.inanimate_path, Animacy::Inanimate),
    ] {
        let (rows, _) = read_sampler_input(path).unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|r| r.animacy == label));
    }

    // Same seed, same files.
    let first = fs::read_to_string(&summary.animate_path).unwrap();
    run_sample(&args).unwrap();
    assert_eq!(fs::read_to_string(&summary.animate_path).unwrap(), first);
}
