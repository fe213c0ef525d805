use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance_id: Option<u64>,
    pub company_id: u64,
    pub employee_id: u64,
    pub att_date: NaiveDate,
    #[serde(default)]
    pub tt1_in: Option<String>,
    #[serde(default)]
    pub tt1_out: Option<String>,
    #[serde(default)]
    pub tt2_in: Option<String>,
    #[serde(default)]
    pub tt2_out: Option<String>,
    #[serde(default)]
    pub tt3_in: Option<String>,
    #[serde(default)]
    pub tt3_out: Option<String>,
    #[serde(default)]
    pub tt4_in: Option<String>,
    #[serde(default)]
    pub tt4_out: Option<String>,
    #[serde(default)]
    pub ot_in: Option<String>,
    #[serde(default)]
    pub ot_out: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub basic: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub ot: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub nd: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub late: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub holiday: f64,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceScheduleReference {
    pub shift: Option<String>,
    pub break_period: Option<u32>,
    pub grace_period: Option<u32>,
    pub timein: Option<String>,
    pub timeout: Option<String>,
}

/// One day of attendance as returned by the by-date endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    pub attendance: Attendance,
    #[serde(default)]
    pub schedule: Option<AttendanceScheduleReference>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub employee_id: Option<u64>,
    pub company_id: u64,
    pub designation_id: u64,
    pub time_in: String,
    pub time_out: String,
    #[serde(default)]
    pub late_threshold: Option<u32>,
    #[serde(rename = "break", default)]
    pub break_minutes: Option<u32>,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Attendance and schedules for a date range, both keyed by `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSchedule {
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendance: BTreeMap<String, Attendance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub schedule: BTreeMap<String, Schedule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEmployee {
    pub employee_id: u64,
    pub fname: String,
    pub lname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSubmitter {
    pub id: u64,
    pub username: String,
}

/// An attendance correction (COA), official business (OB) or overtime (OT) request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRequest {
    pub id: u64,
    pub employee_id: u64,
    pub request_type: String,
    pub att_date: NaiveDate,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub logs: Option<BTreeMap<String, Option<String>>>,
    #[serde(default)]
    pub remarks: Option<String>,
    pub status: String,
    #[serde(default)]
    pub approver_id: Option<u64>,
    #[serde(default)]
    pub submitted_by: Option<u64>,
    #[serde(default)]
    pub approved_at: Option<String>,
    #[serde(default)]
    pub rejected_at: Option<String>,
    #[serde(default)]
    pub decision_notes: Option<String>,
    #[serde(default)]
    pub employee: Option<RequestEmployee>,
    #[serde(default)]
    pub approver: Option<Value>,
    #[serde(default)]
    pub submitter: Option<RequestSubmitter>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    #[serde(rename = "COA")]
    CertificateOfAttendance,
    #[serde(rename = "OB")]
    OfficialBusiness,
    #[serde(rename = "OT")]
    Overtime,
}

/// Body for filing a new attendance request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRequestPayload {
    pub request_type: RequestType,
    pub att_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logs: Option<BTreeMap<String, Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBreakdown {
    pub date: NaiveDate,
    /// Day type id, see `LEAVE_DAY_TYPES`.
    pub duration: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEmployee {
    pub employee_id: u64,
    pub fname: String,
    pub lname: String,
    #[serde(default)]
    pub mname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLeave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    pub leave_type: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_breakdown: Option<Vec<LeaveBreakdown>>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<LeaveEmployee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Leaves partitioned by review status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeLeaveBuckets {
    #[serde(default)]
    pub pending: Vec<EmployeeLeave>,
    #[serde(default)]
    pub approved: Vec<EmployeeLeave>,
    #[serde(default)]
    pub rejected: Vec<EmployeeLeave>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(default)]
    pub company_id: Option<u64>,
    #[serde(default)]
    pub parent_id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Designation {
    #[serde(default)]
    pub designation_id: Option<u64>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentStatus {
    pub id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<u64>,
    pub id_num: String,
    pub fname: String,
    #[serde(default)]
    pub mname: Option<String>,
    pub lname: String,
    #[serde(default)]
    pub present_address: Option<String>,
    #[serde(default)]
    pub home_address: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    pub sss: Option<String>,
    #[serde(default)]
    pub philhealth: Option<String>,
    #[serde(default)]
    pub pagibig: Option<String>,
    #[serde(default)]
    pub tin: Option<String>,
    #[serde(default)]
    pub marital_status: Option<u8>,
    #[serde(default)]
    pub gender: Option<u8>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub bank_account: Option<String>,
    #[serde(default)]
    pub hired_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<Designation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<EmploymentStatus>,
    #[serde(default)]
    pub non_mwe: Option<bool>,
    #[serde(default)]
    pub company_id: Option<u64>,
    #[serde(default)]
    pub designation_id: Option<u64>,
    /// Either a company object or a company id, depending on the endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipDetailItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub payslip_id: u64,
    #[serde(rename = "type", deserialize_with = "lenient_u64")]
    pub kind: u64,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub item_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayslipBreakdown {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
    #[serde(default)]
    pub details: Vec<PayslipDetailItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PayslipDetails {
    #[serde(default)]
    pub income: Option<PayslipBreakdown>,
    #[serde(default)]
    pub deduction: Option<PayslipBreakdown>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub payslip_id: u64,
    #[serde(deserialize_with = "lenient_u64")]
    pub employee_id: u64,
    pub payroll_date: NaiveDate,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub basic_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub late_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub net_pay: Option<f64>,
    #[serde(default)]
    pub payslip_details: Option<PayslipDetails>,
    #[serde(default)]
    pub income: Option<PayslipBreakdown>,
    #[serde(default)]
    pub deduction: Option<PayslipBreakdown>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub status: Option<u8>,
}

/// A static `{ id, title }` option used by selects in the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LookupOption {
    pub id: u8,
    pub title: &'static str,
}

pub fn lookup_title(options: &[LookupOption], id: u8) -> Option<&'static str> {
    options
        .iter()
        .find(|option| option.id == id)
        .map(|option| option.title)
}

// HRIS amounts arrive as JSON numbers or numeric strings ("1234.50").
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom("number out of range")),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text.trim().parse().map(Some).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

fn lenient_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| de::Error::custom("expected an unsigned integer")),
        Value::String(text) => text.trim().parse().map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected an integer, got {}", other))),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
