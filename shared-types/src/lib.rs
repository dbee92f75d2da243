pub mod catalog;
pub mod errors;
pub mod report;
pub mod time_entry;
pub mod timesheet;
pub mod user;

pub use catalog::{
    normalize_code, CatalogItem, CatalogItemsResponse, CreateCatalogItemRequest, Project,
    UpdateCatalogItemRequest, WorkType,
};
pub use errors::{ErrorResponse, ValidationErrors};
pub use report::{
    DailyTotal, ProjectSummary, ProjectTimeReport, ProjectTimeReportQuery, TimeEntryDetail,
    TimesheetReport,
};
pub use time_entry::{
    CreateTimeEntryRequest, TimeEntriesResponse, TimeEntry, UpdateTimeEntryRequest,
};
pub use timesheet::{OpenTimesheetRequest, Timesheet, TimesheetStatus, TimesheetsResponse};
pub use user::{LoginRequest, LoginResponse, RegisterUserRequest, User};
