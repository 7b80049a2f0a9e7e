use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use sea_orm::{FromQueryResult, Value};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use strum::EnumIter;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::error::{TaskError, TaskResult};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// `date` reported by the status endpoint when no month was requested.
pub const OVERALL: &str = "Overall";

static MONTH_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(0[1-9]|1[0-2])-[0-9]{4}$").expect("valid MM-YYYY pattern"));

/// Writable task columns, declared in canonical statement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum TaskColumn {
    TaskName,
    TaskDetails,
    Deadline,
    Completed,
    Priority,
    SetReminder,
    TaskStart,
    StartDate,
}

impl TaskColumn {
    /// Column reference as written in SQL. The camelCase columns need quoting.
    pub fn sql(&self) -> &'static str {
        match self {
            TaskColumn::TaskName => "task_name",
            TaskColumn::TaskDetails => "task_details",
            TaskColumn::Deadline => "deadline",
            TaskColumn::Completed => "completed",
            TaskColumn::Priority => "priority",
            TaskColumn::SetReminder => "set_reminder",
            TaskColumn::TaskStart => r#""taskStart""#,
            TaskColumn::StartDate => r#""startDate""#,
        }
    }
}

/// A request field that distinguishes "not sent" from "sent as null".
///
/// Use with `#[serde(default)]`: a missing key stays [`Field::Absent`],
/// `null` becomes [`Field::Null`], anything else [`Field::Value`]. Falsy
/// values such as `0`, `false` or `""` are values like any other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Absent,
    Null,
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Value(v) => Field::Value(f(v)),
        }
    }

    /// `None` when absent, otherwise the (possibly null) value to store.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Field::Absent => None,
            Field::Null => Some(None),
            Field::Value(v) => Some(Some(v)),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Field::Value(value),
            None => Field::Null,
        })
    }
}

/// 0/1 style column (`completed`, `set_reminder`).
///
/// Accepts JSON integers, booleans, integral floats (`1.0`) and numeric
/// strings (`"1"`); stored as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Flag(pub i16);

impl From<Flag> for i16 {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

impl Flag {
    fn from_float(n: f64) -> Option<Self> {
        let in_range = n.fract() == 0.0 && n >= f64::from(i16::MIN) && n <= f64::from(i16::MAX);
        in_range.then(|| Flag(n as i16))
    }
}

impl FromStr for Flag {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "true" => Ok(Flag(1)),
            "false" => Ok(Flag(0)),
            _ => trimmed
                .parse::<i16>()
                .ok()
                .map(Flag)
                .or_else(|| trimmed.parse::<f64>().ok().and_then(Flag::from_float))
                .ok_or_else(|| ParseValueError::new("flag", s)),
        }
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Bool(bool),
            Int(i16),
            Float(f64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => Ok(Flag(i16::from(b))),
            Raw::Int(n) => Ok(Flag(n)),
            Raw::Float(n) => Flag::from_float(n)
                .ok_or_else(|| serde::de::Error::custom(ParseValueError::new("flag", &n.to_string()))),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Free-text column (`task_name`, `task_details`, `priority`).
///
/// Any JSON scalar is accepted and stored in its text form, so `2` becomes
/// `"2"` and `true` becomes `"true"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl From<Text> for String {
    fn from(text: Text) -> Self {
        text.0
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text(s.to_string())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Bool(bool),
            Int(i64),
            Uint(u64),
            Float(f64),
        }

        Ok(Text(match Raw::deserialize(deserializer)? {
            Raw::Str(s) => s,
            Raw::Bool(b) => b.to_string(),
            Raw::Int(n) => n.to_string(),
            Raw::Uint(n) => n.to_string(),
            Raw::Float(n) => n.to_string(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseValueError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

fn deserialize_from_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Task deadline.
///
/// Parses `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS[.fff]]` (space or `T`
/// separator) and RFC 3339 timestamps, which are converted to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(pub NaiveDateTime);

impl FromStr for Deadline {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Deadline(dt.naive_utc()));
        }

        const FORMATS: [&str; 4] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
            "%Y-%m-%d %H:%M",
        ];
        if let Some(dt) = FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Ok(Deadline(dt));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| Deadline(d.and_time(NaiveTime::MIN)))
            .map_err(|_| ParseValueError::new("deadline", s))
    }
}

impl<'de> Deserialize<'de> for Deadline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl From<Deadline> for NaiveDateTime {
    fn from(value: Deadline) -> Self {
        value.0
    }
}

/// Time of day a task starts, `HH:MM` or `HH:MM:SS[.fff]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskStart(pub NaiveTime);

impl FromStr for TaskStart {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(TaskStart)
            .map_err(|_| ParseValueError::new("taskStart", s))
    }
}

impl<'de> Deserialize<'de> for TaskStart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl From<TaskStart> for NaiveTime {
    fn from(value: TaskStart) -> Self {
        value.0
    }
}

/// Calendar day a task starts, `YYYY-MM-DD`. A full timestamp is cut to its
/// date part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartDate(pub NaiveDate);

impl FromStr for StartDate {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(StartDate)
            .or_else(|_| s.parse::<Deadline>().map(|d| StartDate(d.0.date())))
            .map_err(|_| ParseValueError::new("startDate", s))
    }
}

impl<'de> Deserialize<'de> for StartDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_from_str(deserializer)
    }
}

impl From<StartDate> for NaiveDate {
    fn from(value: StartDate) -> Self {
        value.0
    }
}

/// Task row as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct Task {
    /// Store-assigned identifier
    pub id: i64,
    pub task_name: Option<String>,
    pub task_details: Option<String>,
    pub deadline: Option<NaiveDateTime>,
    /// 0 = open, 1 = completed
    pub completed: Option<i16>,
    pub priority: Option<String>,
    pub set_reminder: Option<i16>,
    #[serde(rename = "taskStart")]
    pub task_start: Option<NaiveTime>,
    #[serde(rename = "startDate")]
    pub start_date: Option<NaiveDate>,
}

/// Body of `POST /createTask`. Every field is optional; missing ones are
/// stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct CreateTask {
    #[schema(value_type = Option<String>)]
    pub task_name: Option<Text>,
    #[schema(value_type = Option<String>)]
    pub task_details: Option<Text>,
    #[schema(value_type = Option<String>, example = "2024-05-31 17:00:00")]
    pub deadline: Option<Deadline>,
    #[schema(value_type = Option<i16>, example = 0)]
    pub completed: Option<Flag>,
    #[schema(value_type = Option<String>, example = "high")]
    pub priority: Option<Text>,
    #[schema(value_type = Option<i16>, example = 1)]
    pub set_reminder: Option<Flag>,
    #[serde(rename = "taskStart")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub task_start: Option<TaskStart>,
    #[serde(rename = "startDate")]
    #[schema(value_type = Option<String>, example = "2024-05-20")]
    pub start_date: Option<StartDate>,
}

impl CreateTask {
    /// One value per [`TaskColumn`], in canonical order.
    pub fn into_values(self) -> Vec<Value> {
        vec![
            Value::from(self.task_name.map(String::from)),
            Value::from(self.task_details.map(String::from)),
            Value::from(self.deadline.map(NaiveDateTime::from)),
            Value::from(self.completed.map(i16::from)),
            Value::from(self.priority.map(String::from)),
            Value::from(self.set_reminder.map(i16::from)),
            Value::from(self.task_start.map(NaiveTime::from)),
            Value::from(self.start_date.map(NaiveDate::from)),
        ]
    }
}

/// Body of `PUT /updateTask/{taskId}`.
///
/// Only keys present in the JSON are written; an explicit `null` clears the
/// column.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct UpdateTask {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub task_name: Field<Text>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub task_details: Field<Text>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "2024-05-31 17:00:00")]
    pub deadline: Field<Deadline>,
    #[serde(default)]
    #[schema(value_type = Option<i16>, example = 1)]
    pub completed: Field<Flag>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "high")]
    pub priority: Field<Text>,
    #[serde(default)]
    #[schema(value_type = Option<i16>)]
    pub set_reminder: Field<Flag>,
    #[serde(default, rename = "taskStart")]
    #[schema(value_type = Option<String>, example = "09:30")]
    pub task_start: Field<TaskStart>,
    #[serde(default, rename = "startDate")]
    #[schema(value_type = Option<String>, example = "2024-05-20")]
    pub start_date: Field<StartDate>,
}

impl UpdateTask {
    /// Present fields as column assignments, in canonical column order.
    pub fn into_changes(self) -> TaskChanges {
        let mut changes = TaskChanges::default();
        changes.set(TaskColumn::TaskName, self.task_name.map(String::from));
        changes.set(TaskColumn::TaskDetails, self.task_details.map(String::from));
        changes.set(TaskColumn::Deadline, self.deadline.map(NaiveDateTime::from));
        changes.set(TaskColumn::Completed, self.completed.map(i16::from));
        changes.set(TaskColumn::Priority, self.priority.map(String::from));
        changes.set(TaskColumn::SetReminder, self.set_reminder.map(i16::from));
        changes.set(TaskColumn::TaskStart, self.task_start.map(NaiveTime::from));
        changes.set(TaskColumn::StartDate, self.start_date.map(NaiveDate::from));
        changes
    }
}

/// Ordered column assignments for a partial update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges(Vec<(TaskColumn, Value)>);

impl TaskChanges {
    /// Records `column` unless `field` is absent.
    pub fn set<T>(&mut self, column: TaskColumn, field: Field<T>)
    where
        Value: From<Option<T>>,
    {
        if let Some(value) = field.into_option() {
            self.0.push((column, Value::from(value)));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(TaskColumn, Value)> {
        self.0.iter()
    }
}

/// Reads a leading integer the way JavaScript's `parseInt` does: optional
/// whitespace and sign, then decimal digits up to the first non-digit.
/// Overflow saturates.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Page window for the list endpoint. Both numbers are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Lenient parse: missing, non-numeric, or non-positive values fall back
    /// to the defaults.
    pub fn from_raw(page: Option<&str>, per_page: Option<&str>) -> Self {
        fn positive_or(raw: Option<&str>, default: i64) -> i64 {
            raw.and_then(parse_leading_int)
                .filter(|n| *n >= 1)
                .unwrap_or(default)
        }

        Self {
            page: positive_or(page, DEFAULT_PAGE),
            per_page: positive_or(per_page, DEFAULT_PER_PAGE),
        }
    }

    /// Clamps the page size when a ceiling is configured.
    pub fn capped(self, max_per_page: Option<i64>) -> Self {
        match max_per_page {
            Some(max) if max >= 1 && self.per_page > max => Self {
                per_page: max,
                ..self
            },
            _ => self,
        }
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Query string of `GET /tasks`. Kept as raw strings so bad paging input
/// degrades to defaults instead of failing.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTasksQuery {
    /// 1-based page number, default 1
    pub page: Option<String>,
    /// Page size, default 10
    pub per_page: Option<String>,
    /// Only tasks starting on this day (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Only tasks starting at this time (HH:MM or HH:MM:SS)
    pub task_start: Option<String>,
}

impl ListTasksQuery {
    pub fn into_filter(self, max_per_page: Option<i64>) -> TaskResult<TaskFilter> {
        let pagination = Pagination::from_raw(self.page.as_deref(), self.per_page.as_deref())
            .capped(max_per_page);

        Ok(TaskFilter {
            pagination,
            start_date: parse_filter::<StartDate>("startDate", self.start_date)?.map(|d| d.0),
            task_start: parse_filter::<TaskStart>("taskStart", self.task_start)?.map(|t| t.0),
        })
    }
}

// Empty strings mean "no filter".
fn parse_filter<T: FromStr>(name: &'static str, raw: Option<String>) -> TaskResult<Option<T>> {
    match raw {
        Some(value) if !value.is_empty() => value
            .parse()
            .map(Some)
            .map_err(|_| TaskError::InvalidFilter { name, value }),
        _ => Ok(None),
    }
}

/// Parsed list request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub pagination: Pagination,
    pub start_date: Option<NaiveDate>,
    pub task_start: Option<NaiveTime>,
}

/// A month in `MM-YYYY` form, matched against `deadline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthYear(String);

impl MonthYear {
    pub fn parse(raw: &str) -> Option<Self> {
        MONTH_YEAR
            .is_match(raw)
            .then(|| MonthYear(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Query string of `GET /taskStatus`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Month to report on, MM-YYYY. Omit for all tasks.
    pub date: Option<String>,
}

impl StatusQuery {
    /// `None` means the overall report. An empty `date` counts as omitted.
    pub fn into_period(self) -> TaskResult<Option<MonthYear>> {
        match self.date {
            Some(raw) if !raw.is_empty() => MonthYear::parse(&raw)
                .map(Some)
                .ok_or(TaskError::InvalidDate(raw)),
            _ => Ok(None),
        }
    }
}

/// Aggregated completion counts. Each is `null` when no task matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromQueryResult, ToSchema)]
pub struct StatusCounts {
    /// Tasks with `completed = 0`
    pub open_tasks: Option<i64>,
    /// Tasks whose `completed` is anything but 1, NULL included
    pub inprogress_tasks: Option<i64>,
    /// Tasks with `completed = 1`
    pub completed_tasks: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskStatusReport {
    /// The requested month, or "Overall"
    #[schema(example = "05-2024")]
    pub date: String,
    pub metrics: StatusCounts,
}

impl TaskStatusReport {
    pub fn new(period: Option<&MonthYear>, metrics: StatusCounts) -> Self {
        Self {
            date: period.map_or_else(|| OVERALL.to_string(), |p| p.to_string()),
            metrics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "SUCCESS")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Tunables for the task service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSettings {
    /// Upper bound for `perPage`; unbounded when `None`
    pub max_per_page: Option<i64>,
}
