use exam_core::model::{Catalog, ExamResult, ResultId, UserId};
use exam_core::time::fixed_now;
use storage::json::JsonHistoryRepository;
use storage::repository::HistoryRepository;

fn build_result(correct_at: &[usize]) -> ExamResult {
    let questions = Catalog::builtin().questions().to_vec();
    let answers: Vec<Option<u32>> = questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            correct_at
                .contains(&index)
                .then(|| question.correct_option())
        })
        .collect();
    ExamResult::from_answers(
        ResultId::generate(),
        UserId::new("integration-user"),
        &questions,
        &answers,
        600,
        fixed_now(),
    )
    .unwrap()
}

#[tokio::test]
async fn json_roundtrip_preserves_results_and_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = JsonHistoryRepository::open(dir.path().join("history.json"))
        .await
        .expect("open");

    let first = build_result(&[0, 2, 4]);
    let second = build_result(&[1]);
    repo.append(&first).await.unwrap();
    repo.append(&second).await.unwrap();

    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], first);
    assert_eq!(loaded[1], second);
    assert_eq!(loaded[0].score(), 3);
    assert_eq!(loaded[0].time_taken_seconds(), 600);
}

#[tokio::test]
async fn missing_file_loads_as_empty_history() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = JsonHistoryRepository::open(dir.path().join("never-written.json"))
        .await
        .expect("open");

    assert!(repo.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_file_is_treated_as_empty_and_recoverable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.json");
    std::fs::write(&path, b"{ not json ").unwrap();

    let repo = JsonHistoryRepository::open(&path).await.expect("open");
    assert!(repo.load_all().await.unwrap().is_empty());

    // Appending over the damaged blob starts a fresh single-entry history.
    let result = build_result(&[0]);
    repo.append(&result).await.unwrap();
    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], result);
}

#[tokio::test]
async fn epoch_second_timestamps_are_accepted_on_read() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.json");

    let repo = JsonHistoryRepository::open(&path).await.expect("open");
    repo.append(&build_result(&[0])).await.unwrap();

    // Rewrite the stored timestamp the way older blobs carried it.
    let text = std::fs::read_to_string(&path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value[0]["created_at"] = serde_json::json!(exam_core::time::FIXED_TEST_TIMESTAMP);
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].created_at(), fixed_now());
}

#[tokio::test]
async fn invalid_stored_record_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("history.json");

    let repo = JsonHistoryRepository::open(&path).await.expect("open");
    repo.append(&build_result(&[0])).await.unwrap();
    repo.append(&build_result(&[1])).await.unwrap();

    // Corrupt the first record's score so rehydration fails its checks.
    let text = std::fs::read_to_string(&path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&text).unwrap();
    value[0]["score"] = serde_json::json!(9);
    std::fs::write(&path, serde_json::to_string(&value).unwrap()).unwrap();

    let loaded = repo.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].score(), 1);
}
