//! Tests for the seeding engine and `SqliteStore` against in-memory databases.

use pathway_core::{
  activity::{NewProgress, NewRecommendation, NewUserSkill},
  report::PassStatus,
  schema::ConstraintOutcome,
  seed::{ResourceSeed, SeedInput, SeedRecord, SkillSeed},
  store::CareerStore,
};
use rusqlite::{Connection, types::Value as SqlValue};
use serde_json::json;

use crate::{
  Error, SqliteStore,
  probe::has_composite_unique,
  resolve::Resolver,
  schema,
  seed::SeedPipeline,
  upsert::{ResourceUpserter, SkillUpserter, Upsert, UpsertStrategy},
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn fresh() -> Connection {
  let mut conn = Connection::open_in_memory().expect("in-memory db");
  schema::apply_pragmas(&conn).unwrap();
  schema::create(&mut conn).unwrap();
  conn
}

/// A store whose `learning_resources` table predates `UNIQUE (title, url)`.
fn legacy(duplicates: bool) -> (Connection, ConstraintOutcome) {
  let mut conn = Connection::open_in_memory().expect("in-memory db");
  schema::apply_pragmas(&conn).unwrap();
  conn
    .execute_batch(
      "CREATE TABLE learning_resources (
         id            INTEGER PRIMARY KEY AUTOINCREMENT,
         title         TEXT NOT NULL,
         url           TEXT NOT NULL,
         provider      TEXT,
         resource_type TEXT,
         difficulty    TEXT,
         description   TEXT
       );
       INSERT INTO learning_resources (title, url, provider)
       VALUES ('Rust Book', 'https://doc.rust-lang.org/book', 'old');",
    )
    .unwrap();
  if duplicates {
    conn
      .execute(
        "INSERT INTO learning_resources (title, url, provider)
         VALUES ('Rust Book', 'https://doc.rust-lang.org/book', 'older')",
        [],
      )
      .unwrap();
  }
  let outcome = schema::create(&mut conn).unwrap();
  (conn, outcome)
}

fn sample_input() -> SeedInput {
  SeedInput {
    skills:       Some(vec![
      json!({ "code": "AUSM", "name": "Assurance", "category": "Security",
              "level_min": 2, "level_max": 5 }),
      json!({ "code": "PROG", "name": "Programming", "level_min": 1, "level_max": 6 }),
      json!({ "name": "Mentoring" }),
    ]),
    roles:        Some(vec![
      json!({
        "name": "SecEng", "family": "Engineering", "seniority": "Mid",
        "requirements": [
          { "skill": "AUSM", "target_level": 4, "weight": 0.8 },
          { "skill": "Programming" },
          { "skill": "NOPE" }
        ]
      }),
      json!({
        "name": "Senior SecEng", "seniority": "Senior",
        "requirements": [{ "skill": "Mentoring", "target_level": 5 }]
      }),
    ]),
    resources:    Some(vec![json!({
      "title": "Rust Book", "url": "https://doc.rust-lang.org/book",
      "provider": "Rust Project", "resource_type": "book",
      "skills": [
        { "skill": "PROG", "level_min": 1, "level_max": 4 },
        { "skill": "Assurance" },
        { "skill": "Cooking" }
      ]
    })]),
    career_paths: Some(vec![json!({
      "from": "SecEng", "to": "Senior SecEng", "rationale": "Lead assurance work"
    })]),
  }
}

fn count(conn: &Connection, table: &str) -> i64 {
  conn
    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
    .unwrap()
}

fn dump(conn: &Connection, table: &str) -> Vec<Vec<SqlValue>> {
  let mut stmt = conn
    .prepare(&format!("SELECT * FROM {table} ORDER BY id"))
    .unwrap();
  let columns = stmt.column_count();
  stmt
    .query_map([], |row| {
      (0..columns)
        .map(|i| row.get::<_, SqlValue>(i))
        .collect::<rusqlite::Result<Vec<_>>>()
    })
    .unwrap()
    .collect::<rusqlite::Result<Vec<_>>>()
    .unwrap()
}

const SEEDED_TABLES: [&str; 6] = [
  "skills",
  "roles",
  "role_skill_requirements",
  "learning_resources",
  "learning_resource_skills",
  "career_paths",
];

fn skill_id(conn: &Connection, token: &str) -> i64 {
  Resolver::new(conn).skill_id(token).unwrap().expect("skill exists")
}

fn role_id(conn: &Connection, name: &str) -> i64 {
  Resolver::new(conn).role_id(name).unwrap().expect("role exists")
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[test]
fn fresh_schema_already_enforces_resource_uniqueness() {
  let mut conn = Connection::open_in_memory().unwrap();
  schema::apply_pragmas(&conn).unwrap();
  assert_eq!(schema::create(&mut conn).unwrap(), ConstraintOutcome::AlreadyPresent);
}

#[test]
fn schema_creation_is_repeatable_and_keeps_data() {
  let mut conn = fresh();
  SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  let before = dump(&conn, "skills");

  assert_eq!(schema::create(&mut conn).unwrap(), ConstraintOutcome::AlreadyPresent);
  assert_eq!(dump(&conn, "skills"), before);
}

#[test]
fn legacy_table_without_duplicates_gains_index() {
  let (conn, outcome) = legacy(false);
  assert_eq!(outcome, ConstraintOutcome::Added);
  assert!(has_composite_unique(&conn, "learning_resources", &["title", "url"]));
}

#[test]
fn legacy_table_with_duplicates_is_left_alone() {
  let (conn, outcome) = legacy(true);
  assert_eq!(outcome, ConstraintOutcome::SkippedAlreadyViolated);
  assert!(!outcome.is_enforced());
  assert!(!has_composite_unique(&conn, "learning_resources", &["title", "url"]));
  assert_eq!(count(&conn, "learning_resources"), 2);
}

#[test]
fn index_name_taken_by_non_unique_index_is_not_reported_as_added() {
  let mut conn = Connection::open_in_memory().unwrap();
  schema::apply_pragmas(&conn).unwrap();
  conn
    .execute_batch(
      "CREATE TABLE learning_resources (
         id    INTEGER PRIMARY KEY AUTOINCREMENT,
         title TEXT NOT NULL,
         url   TEXT NOT NULL
       );
       CREATE INDEX ux_learning_resources_title_url ON learning_resources(title, url);
       INSERT INTO learning_resources (title, url) VALUES ('t', 'u'), ('t', 'u');",
    )
    .unwrap();

  let outcome = schema::create(&mut conn).unwrap();
  assert_eq!(outcome, ConstraintOutcome::SkippedUnknown);
  assert_eq!(
    outcome.is_enforced(),
    has_composite_unique(&conn, "learning_resources", &["title", "url"])
  );
  assert_eq!(ResourceUpserter::detect(&conn).strategy(), UpsertStrategy::Fallback);
}

#[test]
fn unwritable_store_skips_uniqueness_as_unknown() {
  let (conn, _) = legacy(true);
  conn
    .execute_batch(
      "DELETE FROM learning_resources WHERE provider = 'older';
       DROP INDEX IF EXISTS ux_learning_resources_title_url;
       PRAGMA query_only = ON;",
    )
    .unwrap();

  assert_eq!(schema::ensure_resource_unique(&conn), ConstraintOutcome::SkippedUnknown);
  assert!(!has_composite_unique(&conn, "learning_resources", &["title", "url"]));
}

// ─── Constraint probe ────────────────────────────────────────────────────────

#[test]
fn probe_is_column_order_sensitive() {
  let conn = fresh();
  assert!(has_composite_unique(&conn, "learning_resources", &["title", "url"]));
  assert!(!has_composite_unique(&conn, "learning_resources", &["url", "title"]));
  assert!(!has_composite_unique(&conn, "learning_resources", &["title"]));
}

#[test]
fn probe_ignores_reversed_and_partial_indexes() {
  let (conn, _) = legacy(true);
  conn
    .execute_batch(
      "DELETE FROM learning_resources WHERE provider = 'older';
       CREATE UNIQUE INDEX ux_reversed ON learning_resources(url, title);
       CREATE UNIQUE INDEX ux_partial  ON learning_resources(title, url) WHERE provider = 'x';",
    )
    .unwrap();
  assert!(!has_composite_unique(&conn, "learning_resources", &["title", "url"]));
  assert!(has_composite_unique(&conn, "learning_resources", &["url", "title"]));
}

#[test]
fn probe_reports_false_for_unknown_table() {
  let conn = fresh();
  assert!(!has_composite_unique(&conn, "no_such_table", &["title", "url"]));
}

#[test]
fn probe_finds_declared_composite_keys() {
  let conn = fresh();
  assert!(has_composite_unique(&conn, "role_skill_requirements", &["role_id", "skill_id"]));
  assert!(has_composite_unique(&conn, "career_paths", &["from_role_id", "to_role_id"]));
  assert!(has_composite_unique(&conn, "skills", &["code"]));
}

// ─── Upserts ─────────────────────────────────────────────────────────────────

#[test]
fn skill_reseed_updates_in_place() {
  let conn = fresh();
  let first = SkillSeed::from_record(&json!({ "code": "X", "name": "A" })).unwrap();
  let second = SkillSeed::from_record(&json!({ "code": "X", "name": "B" })).unwrap();

  let id_a = SkillUpserter.upsert(&conn, &first).unwrap();
  let id_b = SkillUpserter.upsert(&conn, &second).unwrap();

  assert_eq!(id_a, id_b);
  assert_eq!(count(&conn, "skills"), 1);
  let name: String = conn
    .query_row("SELECT name FROM skills WHERE code = 'X'", [], |r| r.get(0))
    .unwrap();
  assert_eq!(name, "B");
}

#[test]
fn codeless_skill_is_matched_by_name() {
  let conn = fresh();
  let v1 = SkillSeed::from_record(&json!({ "name": "Mentoring", "category": "People" })).unwrap();
  let v2 = SkillSeed::from_record(&json!({ "name": "Mentoring", "category": "Leadership" })).unwrap();

  let id1 = SkillUpserter.upsert(&conn, &v1).unwrap();
  let id2 = SkillUpserter.upsert(&conn, &v2).unwrap();

  assert_eq!(id1, id2);
  assert_eq!(count(&conn, "skills"), 1);
  let category: String = conn
    .query_row("SELECT category FROM skills WHERE id = ?1", [id1], |r| r.get(0))
    .unwrap();
  assert_eq!(category, "Leadership");
}

#[test]
fn fallback_upsert_updates_every_duplicate_and_returns_lowest_id() {
  let (conn, _) = legacy(true);
  let upserter = ResourceUpserter::detect(&conn);
  assert_eq!(upserter.strategy(), UpsertStrategy::Fallback);

  let res = ResourceSeed::from_record(&json!({
    "title": "Rust Book", "url": "https://doc.rust-lang.org/book", "provider": "Rust Project"
  }))
  .unwrap();
  let id = upserter.upsert(&conn, &res).unwrap();

  let lowest: i64 = conn
    .query_row("SELECT MIN(id) FROM learning_resources", [], |r| r.get(0))
    .unwrap();
  assert_eq!(id, lowest);
  assert_eq!(count(&conn, "learning_resources"), 2);
  let stale: i64 = conn
    .query_row(
      "SELECT COUNT(*) FROM learning_resources WHERE provider IS NOT 'Rust Project'",
      [],
      |r| r.get(0),
    )
    .unwrap();
  assert_eq!(stale, 0);
}

#[test]
fn fallback_upsert_inserts_new_keys_once() {
  let conn = fresh();
  let upserter = ResourceUpserter::new(UpsertStrategy::Fallback);
  let res = ResourceSeed::from_record(&json!({ "title": "SICP", "url": "https://sicp.example" }))
    .unwrap();

  let first = upserter.upsert(&conn, &res).unwrap();
  let second = upserter.upsert(&conn, &res).unwrap();

  assert_eq!(first, second);
  assert_eq!(count(&conn, "learning_resources"), 1);
}

// ─── Resolution ──────────────────────────────────────────────────────────────

#[test]
fn skill_resolves_identically_by_code_and_name() {
  let mut conn = fresh();
  SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  assert_eq!(skill_id(&conn, "AUSM"), skill_id(&conn, "Assurance"));
  assert!(Resolver::new(&conn).skill_id("Cooking").unwrap().is_none());
  assert!(Resolver::new(&conn).role_id("Chef").unwrap().is_none());
}

#[test]
fn code_match_wins_over_name_match() {
  let conn = fresh();
  conn
    .execute_batch(
      "INSERT INTO skills (code, name) VALUES ('DATA', 'Analytics');
       INSERT INTO skills (code, name) VALUES ('ANLY', 'DATA');",
    )
    .unwrap();
  let by_code: i64 = conn
    .query_row("SELECT id FROM skills WHERE code = 'DATA'", [], |r| r.get(0))
    .unwrap();
  assert_eq!(skill_id(&conn, "DATA"), by_code);
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

#[test]
fn example_scenario_links_requirement() {
  let mut conn = fresh();
  let input = SeedInput {
    skills: Some(vec![
      json!({ "code": "AUSM", "name": "Assurance", "level_min": 2, "level_max": 5 }),
    ]),
    roles: Some(vec![json!({
      "name": "SecEng",
      "requirements": [{ "skill": "AUSM", "target_level": 4, "weight": 0.8 }]
    })]),
    ..SeedInput::default()
  };

  let report = SeedPipeline::new(&mut conn).run(&input).unwrap();
  assert_eq!(report.skills.seeded, 1);
  assert_eq!(report.roles.seeded, 1);
  assert_eq!(report.roles.linked, 1);
  assert_eq!(report.resources.status, PassStatus::Missing);
  assert!(report.career_paths.is_missing());

  assert_eq!(count(&conn, "skills"), 1);
  assert_eq!(count(&conn, "roles"), 1);
  let (level, weight): (i64, f64) = conn
    .query_row(
      "SELECT target_level, weight FROM role_skill_requirements",
      [],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .unwrap();
  assert_eq!(level, 4);
  assert_eq!(weight, 0.8);
}

#[test]
fn full_run_reports_counts() {
  let mut conn = fresh();
  let report = SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();

  assert_eq!((report.skills.seeded, report.skills.failed), (3, 0));
  assert_eq!((report.roles.seeded, report.roles.linked, report.roles.unlinked), (2, 3, 1));
  assert_eq!(
    (report.resources.seeded, report.resources.linked, report.resources.unlinked),
    (1, 2, 1)
  );
  assert_eq!((report.career_paths.seeded, report.career_paths.linked), (1, 1));
  assert_eq!(count(&conn, "role_skill_requirements"), 3);
  assert_eq!(count(&conn, "learning_resource_skills"), 2);
}

#[test]
fn missing_requirement_fields_take_defaults() {
  let mut conn = fresh();
  SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();

  let (level, weight): (i64, f64) = conn
    .query_row(
      "SELECT target_level, weight FROM role_skill_requirements
        WHERE role_id = ?1 AND skill_id = ?2",
      [role_id(&conn, "SecEng"), skill_id(&conn, "PROG")],
      |r| Ok((r.get(0)?, r.get(1)?)),
    )
    .unwrap();
  assert_eq!(level, 3);
  assert_eq!(weight, 1.0);
}

#[test]
fn running_twice_is_idempotent() {
  let mut conn = fresh();
  let first = SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  let snapshot: Vec<_> = SEEDED_TABLES.iter().map(|t| dump(&conn, t)).collect();

  let second = SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  let again: Vec<_> = SEEDED_TABLES.iter().map(|t| dump(&conn, t)).collect();

  assert_eq!(first, second);
  assert_eq!(snapshot, again);
}

#[test]
fn roles_without_skills_are_created_unlinked() {
  let mut conn = fresh();
  let input = SeedInput { roles: sample_input().roles, ..SeedInput::default() };

  let report = SeedPipeline::new(&mut conn).run(&input).unwrap();
  assert!(report.skills.is_missing());
  assert_eq!(report.roles.seeded, 2);
  assert_eq!(report.roles.linked, 0);
  assert_eq!(report.roles.unlinked, 4);
  assert_eq!(count(&conn, "roles"), 2);
  assert_eq!(count(&conn, "role_skill_requirements"), 0);
}

#[test]
fn bad_records_are_skipped_without_aborting_the_pass() {
  let mut conn = fresh();
  let input = SeedInput {
    skills: Some(vec![
      json!({ "code": "NONAME" }),
      json!({ "code": "HIGH", "name": "Too high", "level_max": 9 }),
      json!("not a mapping"),
      json!({ "code": "OK", "name": "Fine" }),
    ]),
    resources: Some(vec![
      json!({ "title": "No url" }),
      json!({ "title": "T", "url": "U", "skills": [{ "level_min": 1 }, { "skill": "OK" }] }),
    ]),
    ..SeedInput::default()
  };

  let report = SeedPipeline::new(&mut conn).run(&input).unwrap();
  assert_eq!((report.skills.seeded, report.skills.failed), (1, 3));
  assert_eq!((report.resources.seeded, report.resources.failed), (1, 1));
  assert_eq!((report.resources.linked, report.resources.unlinked), (1, 1));
  assert_eq!(count(&conn, "skills"), 1);
}

#[test]
fn career_paths_skip_unknown_and_looping_roles() {
  let mut conn = fresh();
  let input = SeedInput {
    roles: Some(vec![json!({ "name": "Dev" }), json!({ "name": "Lead" })]),
    career_paths: Some(vec![
      json!({ "from": "Dev", "to": "Lead", "rationale": "first" }),
      json!({ "from": "Dev", "to": "Lead", "rationale": "second" }),
      json!({ "from": "Dev", "to": "Astronaut" }),
      json!({ "from": "Lead", "to": "Lead" }),
      json!({ "to": "Lead" }),
    ]),
    ..SeedInput::default()
  };

  let report = SeedPipeline::new(&mut conn).run(&input).unwrap();
  assert_eq!(report.career_paths.linked, 2);
  assert_eq!(report.career_paths.unlinked, 2);
  assert_eq!(report.career_paths.failed, 1);
  assert_eq!(count(&conn, "career_paths"), 1);
  let rationale: String = conn
    .query_row("SELECT rationale FROM career_paths", [], |r| r.get(0))
    .unwrap();
  assert_eq!(rationale, "second");
}

#[test]
fn legacy_store_seeds_through_fallback_path() {
  let (mut conn, _) = legacy(true);
  let input = SeedInput { resources: sample_input().resources, ..SeedInput::default() };

  let first = SeedPipeline::new(&mut conn).run(&input).unwrap();
  let second = SeedPipeline::new(&mut conn).run(&input).unwrap();

  assert_eq!(first.resources.seeded, 1);
  assert_eq!(first, second);
  assert_eq!(count(&conn, "learning_resources"), 2);
  // No skills were supplied, so every association is dropped.
  assert_eq!(first.resources.unlinked, 3);
}

#[test]
fn failed_pass_keeps_earlier_passes_committed() {
  let mut conn = fresh();
  let mut commits = 0;
  // Veto the second commit, which belongs to the roles pass.
  conn.commit_hook(Some(move || {
    commits += 1;
    commits == 2
  }));

  let result = SeedPipeline::new(&mut conn).run(&sample_input());
  conn.commit_hook(None::<fn() -> bool>);

  assert!(result.is_err());
  assert_eq!(count(&conn, "skills"), 3);
  assert_eq!(count(&conn, "roles"), 0);
  assert_eq!(count(&conn, "role_skill_requirements"), 0);
  assert_eq!(count(&conn, "learning_resources"), 0);
}

#[test]
fn float_target_level_still_links_requirement() {
  let mut conn = fresh();
  let input = SeedInput {
    skills: Some(vec![json!({ "code": "AUSM", "name": "Assurance" })]),
    roles: Some(vec![json!({
      "name": "SecEng",
      "requirements": [{ "skill": "AUSM", "target_level": 4.0, "weight": 1 }]
    })]),
    ..SeedInput::default()
  };

  let report = SeedPipeline::new(&mut conn).run(&input).unwrap();
  assert_eq!((report.roles.linked, report.roles.unlinked), (1, 0));
  let level: i64 = conn
    .query_row("SELECT target_level FROM role_skill_requirements", [], |r| r.get(0))
    .unwrap();
  assert_eq!(level, 4);
}

// ─── Cascades ────────────────────────────────────────────────────────────────

#[test]
fn deleting_a_skill_cascades_to_dependents() {
  let mut conn = fresh();
  SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  let ausm = skill_id(&conn, "AUSM");
  let prog = skill_id(&conn, "PROG");
  let role = role_id(&conn, "SecEng");

  conn
    .execute(
      "INSERT INTO user_skills (user_id, skill_id, level) VALUES (1, ?1, 3)",
      [ausm],
    )
    .unwrap();
  conn
    .execute(
      "INSERT INTO user_progress (user_id, role_id, skill_id, action)
       VALUES (1, ?1, ?2, 'assessed_level'), (1, ?1, ?3, 'completed_resource')",
      [role, ausm, prog],
    )
    .unwrap();

  conn.execute("DELETE FROM skills WHERE id = ?1", [ausm]).unwrap();

  for table in ["role_skill_requirements", "user_skills", "learning_resource_skills", "user_progress"] {
    let remaining: i64 = conn
      .query_row(&format!("SELECT COUNT(*) FROM {table} WHERE skill_id = ?1"), [ausm], |r| r.get(0))
      .unwrap();
    assert_eq!(remaining, 0, "{table} still references deleted skill");
  }
  assert_eq!(count(&conn, "user_progress"), 1);
}

#[test]
fn deleting_a_role_nulls_progress_and_cascades_links() {
  let mut conn = fresh();
  SeedPipeline::new(&mut conn).run(&sample_input()).unwrap();
  let role = role_id(&conn, "SecEng");
  let prog = skill_id(&conn, "PROG");

  conn
    .execute(
      "INSERT INTO user_progress (user_id, role_id, skill_id, action)
       VALUES (7, ?1, ?2, 'assessed_level')",
      [role, prog],
    )
    .unwrap();

  conn.execute("DELETE FROM roles WHERE id = ?1", [role]).unwrap();

  let role_ref: Option<i64> = conn
    .query_row("SELECT role_id FROM user_progress WHERE user_id = 7", [], |r| r.get(0))
    .unwrap();
  assert!(role_ref.is_none());
  assert_eq!(count(&conn, "career_paths"), 0);
  let reqs: i64 = conn
    .query_row(
      "SELECT COUNT(*) FROM role_skill_requirements WHERE role_id = ?1",
      [role],
      |r| r.get(0),
    )
    .unwrap();
  assert_eq!(reqs, 0);
}

// ─── SqliteStore ─────────────────────────────────────────────────────────────

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

#[tokio::test]
async fn store_seeds_and_resolves() {
  let s = store().await;
  let report = s.seed(sample_input()).await.unwrap();
  assert_eq!(report.skills.seeded, 3);

  let by_code = s.skill_id("AUSM".into()).await.unwrap();
  let by_name = s.skill_id("Assurance".into()).await.unwrap();
  assert!(by_code.is_some());
  assert_eq!(by_code, by_name);
  assert!(s.role_id("SecEng".into()).await.unwrap().is_some());
  assert!(s.role_id("Chef".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn store_init_schema_is_repeatable() {
  let s = store().await;
  assert_eq!(s.init_schema().await.unwrap(), ConstraintOutcome::AlreadyPresent);
  assert_eq!(s.init_schema().await.unwrap(), ConstraintOutcome::AlreadyPresent);
}

#[tokio::test]
async fn user_skill_upserts_on_user_and_skill() {
  let s = store().await;
  s.seed(sample_input()).await.unwrap();
  let skill_id = s.skill_id("AUSM".into()).await.unwrap().unwrap();

  let first = s
    .set_user_skill(NewUserSkill { user_id: 1, skill_id, level: 2, evidence: None })
    .await
    .unwrap();
  let second = s
    .set_user_skill(NewUserSkill {
      user_id: 1,
      skill_id,
      level: 4,
      evidence: Some("passed audit".into()),
    })
    .await
    .unwrap();
  assert_eq!(first, second);

  let current = s.user_skill(1, skill_id).await.unwrap().unwrap();
  assert_eq!(current.level, 4);
  assert_eq!(current.evidence.as_deref(), Some("passed audit"));
  assert!(s.user_skill(2, skill_id).await.unwrap().is_none());
}

#[tokio::test]
async fn user_skill_level_is_validated() {
  let s = store().await;
  s.seed(sample_input()).await.unwrap();
  let skill_id = s.skill_id("AUSM".into()).await.unwrap().unwrap();

  let err = s
    .set_user_skill(NewUserSkill { user_id: 1, skill_id, level: 9, evidence: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(_)));
}

#[tokio::test]
async fn progress_and_recommendations_append() {
  let s = store().await;
  s.seed(sample_input()).await.unwrap();
  let skill_id = s.skill_id("PROG".into()).await.unwrap().unwrap();
  let role_id = s.role_id("SecEng".into()).await.unwrap();

  let progress = NewProgress {
    user_id: 1,
    role_id,
    skill_id,
    action: "completed_resource".into(),
    details: Some("Rust Book ch. 1-4".into()),
  };
  let a = s.record_progress(progress.clone()).await.unwrap();
  let b = s.record_progress(progress).await.unwrap();
  assert_ne!(a, b);

  let rec = NewRecommendation {
    user_id:         1,
    context:         Some(json!({ "target_role": "Senior SecEng" })),
    recommendations: json!([{ "skill": "Mentoring", "resource": null }]),
  };
  let r1 = s.record_recommendation(rec.clone()).await.unwrap();
  let r2 = s.record_recommendation(rec).await.unwrap();
  assert!(r2 > r1);
}
