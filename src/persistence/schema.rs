//! `SQLite` schema bootstrap logic.
//!
//! All table, index and trigger definitions use `IF NOT EXISTS` and are
//! safe to re-run on every server startup.
//!
//! Status and day-of-week columns hold lower-case snake names and English
//! day names respectively. Dates are `YYYY-MM-DD`, times `HH:MM:SS`,
//! timestamps RFC 3339, money integer cents.

use sqlx::SqlitePool;

use crate::Result;

/// Names of every table created by [`bootstrap_schema`].
pub const TABLES: [&str; 13] = [
    "member",
    "trainer",
    "admin_staff",
    "room",
    "equipment",
    "trainer_availability",
    "personal_training_session",
    "class",
    "class_registration",
    "health_metric",
    "fitness_goal",
    "bill",
    "payment",
];

/// Apply all table definitions to the connected `SQLite` database.
///
/// Besides the tables this installs two `BEFORE INSERT` triggers on
/// `personal_training_session` that abort any scheduled insert overlapping
/// another scheduled session of the same trainer or room on the same date.
///
/// # Errors
///
/// Returns `AppError::Db` if any DDL statement fails.
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<()> {
    let ddl = r"
CREATE TABLE IF NOT EXISTS member (
    member_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    date_of_birth   TEXT,
    gender          TEXT,
    phone           TEXT,
    address         TEXT,
    join_date       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS trainer (
    trainer_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    specialization  TEXT,
    phone           TEXT
);

CREATE TABLE IF NOT EXISTS admin_staff (
    admin_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE,
    first_name      TEXT NOT NULL,
    last_name       TEXT NOT NULL,
    role            TEXT
);

CREATE TABLE IF NOT EXISTS room (
    room_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    room_name       TEXT NOT NULL,
    room_type       TEXT NOT NULL,
    capacity        INTEGER NOT NULL CHECK(capacity > 0)
);

CREATE TABLE IF NOT EXISTS equipment (
    equipment_id          INTEGER PRIMARY KEY AUTOINCREMENT,
    equipment_name        TEXT NOT NULL,
    room_id               INTEGER REFERENCES room(room_id),
    status                TEXT NOT NULL
        CHECK(status IN ('operational','maintenance','out_of_service')),
    last_maintenance_date TEXT,
    maintenance_notes     TEXT
);

CREATE TABLE IF NOT EXISTS trainer_availability (
    availability_id INTEGER PRIMARY KEY AUTOINCREMENT,
    trainer_id      INTEGER NOT NULL REFERENCES trainer(trainer_id),
    day_of_week     TEXT NOT NULL CHECK(day_of_week IN
        ('Monday','Tuesday','Wednesday','Thursday','Friday','Saturday','Sunday')),
    start_time      TEXT NOT NULL,
    end_time        TEXT NOT NULL,
    CHECK(start_time < end_time)
);

CREATE TABLE IF NOT EXISTS personal_training_session (
    session_id      INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id       INTEGER NOT NULL REFERENCES member(member_id),
    trainer_id      INTEGER NOT NULL REFERENCES trainer(trainer_id),
    room_id         INTEGER NOT NULL REFERENCES room(room_id),
    session_date    TEXT NOT NULL,
    start_time      TEXT NOT NULL,
    end_time        TEXT NOT NULL,
    status          TEXT NOT NULL CHECK(status IN ('scheduled','cancelled','completed')),
    notes           TEXT,
    created_at      TEXT NOT NULL,
    CHECK(start_time < end_time)
);

CREATE TABLE IF NOT EXISTS class (
    class_id            INTEGER PRIMARY KEY AUTOINCREMENT,
    class_name          TEXT NOT NULL,
    trainer_id          INTEGER NOT NULL REFERENCES trainer(trainer_id),
    room_id             INTEGER NOT NULL REFERENCES room(room_id),
    schedule_date       TEXT NOT NULL,
    start_time          TEXT NOT NULL,
    end_time            TEXT NOT NULL,
    capacity            INTEGER NOT NULL CHECK(capacity > 0),
    current_enrollment  INTEGER NOT NULL DEFAULT 0 CHECK(current_enrollment >= 0),
    status              TEXT NOT NULL CHECK(status IN ('scheduled','cancelled','completed')),
    CHECK(start_time < end_time),
    CHECK(current_enrollment <= capacity)
);

CREATE TABLE IF NOT EXISTS class_registration (
    registration_id INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id       INTEGER NOT NULL REFERENCES member(member_id),
    class_id        INTEGER NOT NULL REFERENCES class(class_id),
    registered_at   TEXT NOT NULL,
    status          TEXT NOT NULL CHECK(status IN ('registered','cancelled','attended')),
    UNIQUE(member_id, class_id)
);

CREATE TABLE IF NOT EXISTS health_metric (
    metric_id           INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id           INTEGER NOT NULL REFERENCES member(member_id),
    recorded_at         TEXT NOT NULL,
    weight              REAL,
    height              REAL,
    heart_rate          INTEGER,
    blood_pressure      TEXT,
    body_fat_percentage REAL,
    notes               TEXT
);

CREATE TABLE IF NOT EXISTS fitness_goal (
    goal_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id       INTEGER NOT NULL REFERENCES member(member_id),
    goal_type       TEXT NOT NULL,
    target_value    REAL,
    current_value   REAL,
    target_date     TEXT,
    status          TEXT NOT NULL CHECK(status IN ('active','achieved','abandoned')),
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bill (
    bill_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id       INTEGER NOT NULL REFERENCES member(member_id),
    bill_date       TEXT NOT NULL,
    due_date        TEXT NOT NULL,
    total_amount    INTEGER NOT NULL CHECK(total_amount > 0),
    amount_paid     INTEGER NOT NULL DEFAULT 0 CHECK(amount_paid >= 0),
    status          TEXT NOT NULL CHECK(status IN ('pending','paid')),
    description     TEXT
);

CREATE TABLE IF NOT EXISTS payment (
    payment_id            INTEGER PRIMARY KEY AUTOINCREMENT,
    bill_id               INTEGER NOT NULL REFERENCES bill(bill_id),
    amount                INTEGER NOT NULL CHECK(amount > 0),
    payment_method        TEXT NOT NULL CHECK(payment_method IN ('cash','card','transfer')),
    transaction_reference TEXT,
    paid_at               TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_availability_trainer_day
    ON trainer_availability(trainer_id, day_of_week);
CREATE INDEX IF NOT EXISTS idx_session_trainer_date
    ON personal_training_session(trainer_id, session_date);
CREATE INDEX IF NOT EXISTS idx_session_room_date
    ON personal_training_session(room_id, session_date);
CREATE INDEX IF NOT EXISTS idx_session_member ON personal_training_session(member_id);
CREATE INDEX IF NOT EXISTS idx_room_type ON room(room_type);
CREATE INDEX IF NOT EXISTS idx_class_date ON class(schedule_date);
CREATE INDEX IF NOT EXISTS idx_registration_member ON class_registration(member_id);
CREATE INDEX IF NOT EXISTS idx_metric_member ON health_metric(member_id);
CREATE INDEX IF NOT EXISTS idx_goal_member ON fitness_goal(member_id);
CREATE INDEX IF NOT EXISTS idx_bill_member ON bill(member_id);
CREATE INDEX IF NOT EXISTS idx_payment_bill ON payment(bill_id);

CREATE TRIGGER IF NOT EXISTS trg_session_trainer_overlap
BEFORE INSERT ON personal_training_session
WHEN NEW.status = 'scheduled'
BEGIN
    SELECT RAISE(ABORT, 'trainer already booked for an overlapping interval')
    WHERE EXISTS (
        SELECT 1 FROM personal_training_session
        WHERE trainer_id = NEW.trainer_id
          AND session_date = NEW.session_date
          AND status = 'scheduled'
          AND start_time < NEW.end_time
          AND end_time > NEW.start_time
    );
END;

CREATE TRIGGER IF NOT EXISTS trg_session_room_overlap
BEFORE INSERT ON personal_training_session
WHEN NEW.status = 'scheduled'
BEGIN
    SELECT RAISE(ABORT, 'room already booked for an overlapping interval')
    WHERE EXISTS (
        SELECT 1 FROM personal_training_session
        WHERE room_id = NEW.room_id
          AND session_date = NEW.session_date
          AND status = 'scheduled'
          AND start_time < NEW.end_time
          AND end_time > NEW.start_time
    );
END;
";

    sqlx::raw_sql(ddl).execute(pool).await?;
    Ok(())
}
