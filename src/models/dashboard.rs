//! Aggregated read models for the member, trainer and admin views.

use serde::Serialize;

use super::billing::Money;
use super::class::ClassListing;
use super::health::{FitnessGoal, HealthMetric};
use super::member::Member;
use super::trainer::AvailabilityWindow;
use super::training::SessionListing;

/// Everything a member sees on their profile page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberProfile {
    /// Member record.
    pub member: Member,
    /// Most recent metrics, newest first.
    pub metrics: Vec<HealthMetric>,
    /// All goals, newest first.
    pub goals: Vec<FitnessGoal>,
}

/// Member landing page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberDashboard {
    /// Member record.
    pub member: Member,
    /// Most recent metric, if any.
    pub latest_metric: Option<HealthMetric>,
    /// Active goals ordered by target date.
    pub active_goals: Vec<FitnessGoal>,
    /// Next scheduled training sessions.
    pub upcoming_sessions: Vec<SessionListing>,
    /// Upcoming classes the member is registered for.
    pub registered_classes: Vec<ClassListing>,
    /// Sum still owed across pending bills.
    pub pending_balance: Money,
}

/// Trainer timetable.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TrainerSchedule {
    /// Upcoming scheduled sessions.
    pub sessions: Vec<SessionListing>,
    /// Upcoming scheduled classes.
    pub classes: Vec<ClassListing>,
    /// Weekly availability, Monday first.
    pub availability: Vec<AvailabilityWindow>,
}

/// What a trainer sees about one of their members.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MemberDetail {
    /// Member record.
    pub member: Member,
    /// Most recent metric, if any.
    pub latest_metric: Option<HealthMetric>,
    /// Active goals.
    pub active_goals: Vec<FitnessGoal>,
}

/// Club-wide figures for administrators.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ClubStats {
    /// Registered members.
    pub total_members: i64,
    /// Employed trainers.
    pub total_trainers: i64,
    /// Scheduled classes from today on.
    pub upcoming_classes: i64,
    /// Outstanding amount across pending bills.
    pub pending_revenue: Money,
}
