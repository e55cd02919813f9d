//! Integration tests for `SqliteSource` against an in-memory database.

use cardpulse_core::{Dataset, config::DatabaseConfig, source::SnapshotSource};
use chrono::{NaiveDate, NaiveDateTime};

use crate::{Error, SqliteSource};

const FIXTURE: &str = "
CREATE TABLE dash_visits (
    item_topic   TEXT    NOT NULL,
    source_topic TEXT    NOT NULL,
    age_segment  TEXT    NOT NULL,
    dt           TEXT    NOT NULL,
    visits       INTEGER NOT NULL
);

CREATE TABLE dash_engagements (
    event        TEXT    NOT NULL,
    age_segment  TEXT    NOT NULL,
    item_topic   TEXT    NOT NULL,
    dt           TEXT    NOT NULL,
    unique_users INTEGER NOT NULL
);

INSERT INTO dash_visits VALUES
    ('Юмор', 'Семья', '18-25', '2019-09-24 18:28:00',     5),
    ('Юмор', 'Авто',  '18-25', '2019-09-24T18:29:40',     3),
    ('Авто', 'Семья', '26-30', '2019-09-24 18:30:29.500', 11);

INSERT INTO dash_engagements VALUES
    ('view',  '18-25', 'Юмор', '2019-09-24 18:28:00', 120),
    ('click', '26-30', 'Авто', '2019-09-24 18:29:00', 40);
";

async fn source() -> SqliteSource {
  let s = SqliteSource::open_in_memory()
    .await
    .expect("in-memory source");
  s.execute_batch(FIXTURE).await.expect("fixture");
  s
}

fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
  NaiveDate::from_ymd_opt(2019, 9, 24)
    .unwrap()
    .and_hms_milli_opt(h, m, s, ms)
    .unwrap()
}

#[tokio::test]
async fn loads_visits_as_stored() {
  let s = source().await;
  let visits = s.load_visits().await.unwrap();

  assert_eq!(visits.len(), 3);
  assert_eq!(visits[0].item_topic, "Юмор");
  assert_eq!(visits[0].source_topic, "Семья");
  assert_eq!(visits[0].visits, 5);
  assert_eq!(visits[1].dt, at(18, 29, 40, 0));
  assert_eq!(visits[2].dt, at(18, 30, 29, 500));
}

#[tokio::test]
async fn loads_engagements_as_stored() {
  let s = source().await;
  let engagements = s.load_engagements().await.unwrap();

  assert_eq!(engagements.len(), 2);
  assert_eq!(engagements[1].event, "click");
  assert_eq!(engagements[1].age_segment, "26-30");
  assert_eq!(engagements[1].unique_users, 40);
}

#[tokio::test]
async fn dataset_load_rounds_to_minutes() {
  let s = source().await;
  let ds = Dataset::load(&s).await.unwrap();

  let dts: Vec<NaiveDateTime> = ds.visits().iter().map(|v| v.dt).collect();
  assert_eq!(dts, vec![at(18, 28, 0, 0), at(18, 30, 0, 0), at(18, 30, 0, 0)]);
}

#[tokio::test]
async fn missing_table_fails_the_load() {
  let s = SqliteSource::open_in_memory().await.unwrap();
  s.execute_batch("CREATE TABLE dash_visits (item_topic TEXT);")
    .await
    .unwrap();

  assert!(matches!(s.load_engagements().await, Err(Error::Database(_))));
  assert!(Dataset::load(&s).await.is_err());
}

#[tokio::test]
async fn negative_counts_are_rejected() {
  let s = source().await;
  s.execute_batch(
    "INSERT INTO dash_visits VALUES ('Юмор', 'Семья', '18-25', '2019-09-24 19:00:00', -1);",
  )
  .await
  .unwrap();

  assert!(matches!(
    s.load_visits().await,
    Err(Error::Core(cardpulse_core::Error::NegativeCount { column: "visits", value: -1 }))
  ));
}

#[tokio::test]
async fn unparseable_timestamps_are_rejected() {
  let s = source().await;
  s.execute_batch(
    "INSERT INTO dash_engagements VALUES ('view', '18-25', 'Юмор', 'not a date', 1);",
  )
  .await
  .unwrap();

  assert!(matches!(
    s.load_engagements().await,
    Err(Error::Core(cardpulse_core::Error::InvalidTimestamp(_)))
  ));
}

#[tokio::test]
async fn custom_table_names_are_read() {
  let s = source().await;
  s.execute_batch("CREATE TABLE visits_copy AS SELECT * FROM dash_visits WHERE visits > 4;")
    .await
    .unwrap();

  let s = s.with_tables("visits_copy", "dash_engagements").unwrap();
  assert_eq!(s.load_visits().await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_table_names_are_rejected() {
  let s = source().await;
  assert!(matches!(
    s.with_tables("dash_visits; DROP TABLE dash_visits", "dash_engagements"),
    Err(Error::Core(cardpulse_core::Error::InvalidTableName(_)))
  ));
}

#[tokio::test]
async fn opening_a_missing_file_fails() {
  let cfg = DatabaseConfig {
    scheme:            "sqlite".into(),
    host:              String::new(),
    port:              0,
    user:              String::new(),
    password:          String::new(),
    name:              "/nonexistent/cardpulse/snapshot.db".into(),
    visits_table:      "dash_visits".into(),
    engagements_table: "dash_engagements".into(),
  };
  assert!(matches!(
    SqliteSource::from_config(&cfg).await,
    Err(Error::Database(_))
  ));
}
