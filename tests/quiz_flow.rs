use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use wordwiz::catalog::WordSource;
use wordwiz::sink::JsonFileSink;
use wordwiz::stats;
use wordwiz::store::{FileStore, KeyValueStore, MemoryStore};
use wordwiz::{
    CandidateIndex, Mode, Question, Quiz, QuizOptions, ResultRecord, Step, UsedWords, configure,
    next_question, normalize,
};

fn source(value: serde_json::Value) -> WordSource {
    WordSource::from_json(value).unwrap()
}

fn six_nouns() -> serde_json::Value {
    json!([
        ["apple", "りんご", "", "名詞"],
        ["bread", "パン", "", "名詞"],
        ["chair", "いす", "", "名詞"],
        ["desk", "机", "", "名詞"],
        ["egg", "卵", "", "名詞"],
        ["house", "家", "", "名詞"]
    ])
}

fn expect_question(quiz: &mut Quiz<StdRng>) -> Question {
    match quiz.generate_next_question() {
        Step::Question(q) => q,
        other => panic!("問題が出ませんでした: {other:?}"),
    }
}

#[test]
fn six_nouns_always_give_four_choices() {
    let options = QuizOptions {
        words: Some(source(six_nouns())),
        mode: Mode::HeadwordAsAnswer,
        selection_count: 4,
        question_count: 50,
        ..QuizOptions::default()
    };
    let mut quiz = Quiz::with_rng(configure(options), StdRng::seed_from_u64(11));

    for _ in 0..50 {
        let q = expect_question(&mut quiz);
        assert_eq!(q.choices.len(), 4);
        assert_eq!(
            q.choices.iter().filter(|c| **c == q.word.headword).count(),
            1
        );
        assert_eq!(q.choices[q.correct_index], q.word.headword);
        quiz.record_answer(q.correct_index).unwrap();
    }
    assert_eq!(quiz.session_summary().correct_count, 50);
}

#[test]
fn small_catalogs_give_one_choice_per_word() {
    for size in 1..4 {
        let words: Vec<String> = (0..size).map(|i| format!("word{i}")).collect();
        let catalog = normalize(source(json!(words)));
        let index = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);
        let mut used = UsedWords::new();
        let mut rng = StdRng::seed_from_u64(size as u64);

        let q = next_question(&catalog, &index, &mut used, 4, true, &mut rng).unwrap();
        assert_eq!(q.choices.len(), size);
        let unique: HashSet<&String> = q.choices.iter().collect();
        assert_eq!(unique.len(), size);
        assert_eq!(q.choices[q.correct_index], q.word.headword);
    }
}

#[test]
fn every_word_is_asked_once_per_lap() {
    let catalog = normalize(source(six_nouns()));
    let index = CandidateIndex::build(&catalog, Mode::MeaningAsAnswer);
    let mut used = UsedWords::new();
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..4 {
        let lap: HashSet<usize> = (0..catalog.len())
            .map(|_| {
                next_question(&catalog, &index, &mut used, 4, true, &mut rng)
                    .unwrap()
                    .word_index
            })
            .collect();
        assert_eq!(lap.len(), catalog.len());
    }
}

#[test]
fn similar_distractor_is_excluded() {
    let options = QuizOptions {
        words: Some(source(json!([
            ["insist", "主張する", "", "動詞"],
            ["insisting", "主張している", "", "動詞"],
            ["borrow", "借りる", "", "動詞"],
            ["arrive", "到着する", "", "動詞"]
        ]))),
        mode: Mode::HeadwordAsAnswer,
        selection_count: 3,
        question_count: 100,
        avoid_similar_distractors: true,
        ..QuizOptions::default()
    };
    let mut quiz = Quiz::with_rng(configure(options), StdRng::seed_from_u64(5));

    for _ in 0..40 {
        let q = expect_question(&mut quiz);
        if q.word.headword == "insist" {
            assert!(!q.choices.contains(&"insisting".to_string()));
        }
        if q.word.headword == "insisting" {
            assert!(!q.choices.contains(&"insist".to_string()));
        }
        quiz.record_answer(0).unwrap();
    }
}

#[test]
fn single_word_catalog() {
    let options = QuizOptions {
        words: Some(source(json!({"solo": {"meaning": "ひとり"}}))),
        ..QuizOptions::default()
    };
    let mut quiz = Quiz::with_rng(configure(options), StdRng::seed_from_u64(1));
    let q = expect_question(&mut quiz);
    assert_eq!(q.choices, vec!["ひとり".to_string()]);
    assert_eq!(q.correct_index, 0);
}

#[test]
fn empty_word_list_is_no_data() {
    let options = QuizOptions {
        words: Some(source(json!([42, null]))),
        ..QuizOptions::default()
    };
    let mut quiz = Quiz::with_rng(configure(options), StdRng::seed_from_u64(1));
    assert_eq!(quiz.generate_next_question(), Step::NoData);
}

#[test]
fn finished_session_is_saved_and_submitted() {
    let dir = tempfile::tempdir().unwrap();
    let results_path = dir.path().join("results.json");
    let store = FileStore::open(dir.path().join("store")).unwrap();

    let options = QuizOptions {
        words: Some(source(six_nouns())),
        question_count: 3,
        ..QuizOptions::default()
    };
    let mut quiz = Quiz::with_rng(configure(options), StdRng::seed_from_u64(9))
        .with_store(Box::new(store))
        .with_sink(Box::new(JsonFileSink::new(&results_path)));

    for _ in 0..3 {
        let q = expect_question(&mut quiz);
        quiz.record_answer(q.correct_index).unwrap();
    }
    assert!(quiz.is_finished());

    let submitted: Vec<ResultRecord> =
        serde_json::from_str(&std::fs::read_to_string(&results_path).unwrap()).unwrap();
    assert_eq!(submitted.len(), 3);
    assert!(submitted.iter().all(|r| r.correct));

    // ファイルから読み直しても成績が残っている
    let reopened = FileStore::open(dir.path().join("store")).unwrap();
    let saved = stats::load(&reopened);
    assert_eq!(saved.high_score, 3);
    assert_eq!(saved.sessions.len(), 1);
    assert_eq!(saved.sessions[0].question_count, 3);
}

#[test]
fn persisting_empty_results_adds_zero_session() {
    let mut store = MemoryStore::new();
    let before = stats::load(&store);
    let after = stats::persist(&[], 10, &mut store);
    assert_eq!(after.high_score, before.high_score);
    assert_eq!(after.sessions.len(), 1);
    assert_eq!(after.sessions[0].score, 0);
    assert!(store.get(stats::STATS_KEY).unwrap().is_some());
}
