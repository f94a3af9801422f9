use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveTime};
use poem::Request;
use poem_openapi::{param::Query, payload::Json, OpenApi, Tags};
use rust_decimal::Decimal;

use crate::errors::api::access::AccessError;
use crate::services::RoleGuard;
use crate::stores::ReportStore;
use crate::types::dto::dashboard::{
    CashierReportResponse, CashierReportRow, DoctorActivityRow, SummaryResponse,
};
use crate::types::internal::role::Role;

const SUMMARY_ROLES: &[Role] = &[Role::Creator, Role::Admin, Role::Admin1];
const CASHIER_REPORT_ROLES: &[Role] = &[Role::Creator];

/// Timestamp range covering the given dates, end-exclusive.
fn day_range_bounds(start: NaiveDate, end: NaiveDate) -> (i64, i64) {
    let start_ts = start.and_time(NaiveTime::MIN).and_utc().timestamp();
    let end_ts = (end + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_utc()
        .timestamp();
    (start_ts, end_ts)
}

/// Dashboard and reporting API endpoints
pub struct DashboardApi {
    guard: Arc<RoleGuard>,
    report_store: Arc<ReportStore>,
}

impl DashboardApi {
    pub fn new(guard: Arc<RoleGuard>, report_store: Arc<ReportStore>) -> Self {
        Self { guard, report_store }
    }
}

/// API tags for dashboard endpoints
#[derive(Tags)]
enum DashboardTags {
    /// Dashboard and reports
    Dashboard,
}

#[OpenApi(prefix_path = "/dashboard")]
impl DashboardApi {
    /// Front-desk summary: counts and per-doctor activity for a date range
    ///
    /// The range defaults to today; a missing end date collapses the range
    /// onto its start day.
    #[oai(path = "/summary", method = "get", tag = "DashboardTags::Dashboard")]
    async fn summary(
        &self,
        req: &Request,
        start: Query<Option<NaiveDate>>,
        end: Query<Option<NaiveDate>>,
    ) -> Result<Json<SummaryResponse>, AccessError> {
        self.guard.authorize(req, SUMMARY_ROLES).await?;

        let today = Local::now().date_naive();
        let start_date = start.0.unwrap_or(today);
        let end_date = end.0.unwrap_or(start_date);

        let doctors_count = self.report_store.doctors_count().await?;
        let patients_count = self.report_store.patients_count().await?;
        let appointments_in_range = self
            .report_store
            .appointments_in_range(start_date, end_date)
            .await?;
        let per_doctor = self
            .report_store
            .per_doctor_activity(start_date, end_date)
            .await?
            .into_iter()
            .map(|(d, total)| DoctorActivityRow {
                doctor_id: d.id,
                full_name: d.full_name,
                department: d.department,
                total,
            })
            .collect();

        Ok(Json(SummaryResponse {
            doctors_count,
            patients_count,
            appointments_in_range,
            per_doctor,
            start_date,
            end_date,
        }))
    }

    /// Payments captured by cashiers within a date range, with grand total
    ///
    /// The range defaults to the last 30 days; an inverted range is swapped
    /// rather than rejected.
    #[oai(path = "/reports/cashier", method = "get", tag = "DashboardTags::Dashboard")]
    async fn cashier_report(
        &self,
        req: &Request,
        start: Query<Option<NaiveDate>>,
        end: Query<Option<NaiveDate>>,
    ) -> Result<Json<CashierReportResponse>, AccessError> {
        self.guard.authorize(req, CASHIER_REPORT_ROLES).await?;

        let today = Local::now().date_naive();
        let mut start_date = start.0.unwrap_or(today - Duration::days(30));
        let mut end_date = end.0.unwrap_or(today);
        if end_date < start_date {
            std::mem::swap(&mut start_date, &mut end_date);
        }

        let (start_ts, end_ts) = day_range_bounds(start_date, end_date);
        let entries = self.report_store.cashier_report(start_ts, end_ts).await?;

        let total: Decimal = entries.iter().map(|e| e.amount).sum();
        let rows = entries
            .into_iter()
            .map(|e| CashierReportRow {
                paid_at: e.paid_at,
                patient_name: e.patient_name,
                doctor_name: e.doctor_name,
                amount: e.amount,
                method: e.method,
                cashier_username: e.cashier_username,
                receipt_no: e.receipt_no,
            })
            .collect();

        Ok(Json(CashierReportResponse {
            start_date,
            end_date,
            total,
            rows,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_range_bounds_are_end_exclusive() {
        let start = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 8, 2).unwrap();

        let (start_ts, end_ts) = day_range_bounds(start, end);

        // Two whole days
        assert_eq!(end_ts - start_ts, 2 * 24 * 60 * 60);
    }
}
