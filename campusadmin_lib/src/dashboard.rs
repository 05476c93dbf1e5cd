//! Role-specific dashboard summaries.
//!
//! The stats endpoint returns a loosely-typed body whose shape depends on who
//! is asking. Each role gets its own variant with its own fields, and
//! [`select_dashboard`] is the single place that decides which one to build.

use std::fmt;
use std::str::FromStr;

use campusadmin_api::types::probe::probe_count;
use campusadmin_api::Client;
use serde::Serialize;
use serde_json::Value;

use crate::error::AdminError;

/// Where dashboard counters may live, in lookup order.
const STAT_CONTAINERS: &[&str] = &["", "data", "stats", "data.stats"];

/// The closed set of roles with a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Instructor,
    CustomerCare,
}

impl FromStr for Role {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-' && *c != ' ')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "admin" | "superadmin" => Ok(Role::Admin),
            "instructor" | "teacher" => Ok(Role::Instructor),
            "customercare" | "support" => Ok(Role::CustomerCare),
            _ => Err(AdminError::InvalidInput(format!(
                "unknown role '{}'. Valid roles: admin, instructor, customerCare",
                s
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::CustomerCare => "customerCare",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub users: u64,
    pub products: u64,
    pub courses: u64,
    pub jobs: u64,
    pub orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorStats {
    pub courses: u64,
    pub classrooms: u64,
    pub students: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCareStats {
    pub open_tickets: u64,
    pub resolved_tickets: u64,
    pub users: u64,
}

/// A dashboard, tagged by the role it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Dashboard {
    Admin(AdminStats),
    Instructor(InstructorStats),
    CustomerCare(CustomerCareStats),
}

/// One labelled number on a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
}

fn stat(body: &Value, keys: &[&str]) -> u64 {
    probe_count(body, STAT_CONTAINERS, keys).unwrap_or(0)
}

/// Builds the dashboard for `role` from a stats body. Missing counters read as 0.
pub fn select_dashboard(role: Role, body: &Value) -> Dashboard {
    match role {
        Role::Admin => Dashboard::Admin(AdminStats {
            users: stat(body, &["totalUsers", "users", "userCount"]),
            products: stat(body, &["totalProducts", "products", "productCount"]),
            courses: stat(body, &["totalCourses", "courses", "courseCount"]),
            jobs: stat(body, &["totalJobs", "jobs", "jobCount"]),
            orders: stat(body, &["totalOrders", "orders", "orderCount"]),
        }),
        Role::Instructor => Dashboard::Instructor(InstructorStats {
            courses: stat(body, &["myCourses", "totalCourses", "courses"]),
            classrooms: stat(body, &["myClassrooms", "totalClassrooms", "classrooms"]),
            students: stat(body, &["totalStudents", "students", "studentCount"]),
        }),
        Role::CustomerCare => Dashboard::CustomerCare(CustomerCareStats {
            open_tickets: stat(body, &["openTickets", "pendingTickets", "open"]),
            resolved_tickets: stat(body, &["resolvedTickets", "closedTickets", "resolved"]),
            users: stat(body, &["totalUsers", "users"]),
        }),
    }
}

/// Fetches the stats body at `path` and builds the dashboard for `role`.
pub async fn fetch_dashboard(
    client: &Client,
    role: Role,
    path: &str,
) -> Result<Dashboard, AdminError> {
    let body = client.get_json(path).await?;
    tracing::debug!("{} dashboard from {}", role, path);
    Ok(select_dashboard(role, &body))
}

impl Dashboard {
    pub fn role(&self) -> Role {
        match self {
            Dashboard::Admin(_) => Role::Admin,
            Dashboard::Instructor(_) => Role::Instructor,
            Dashboard::CustomerCare(_) => Role::CustomerCare,
        }
    }

    /// Cards in display order.
    pub fn stat_cards(&self) -> Vec<StatCard> {
        let card = |label, value| StatCard { label, value };
        match self {
            Dashboard::Admin(s) => vec![
                card("Users", s.users),
                card("Products", s.products),
                card("Courses", s.courses),
                card("Jobs", s.jobs),
                card("Orders", s.orders),
            ],
            Dashboard::Instructor(s) => vec![
                card("My courses", s.courses),
                card("Classrooms", s.classrooms),
                card("Students", s.students),
            ],
            Dashboard::CustomerCare(s) => vec![
                card("Open tickets", s.open_tickets),
                card("Resolved tickets", s.resolved_tickets),
                card("Users", s.users),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_parsing_accepts_spellings() {
        assert_eq!("customerCare".parse::<Role>().unwrap(), Role::CustomerCare);
        assert_eq!("customer_care".parse::<Role>().unwrap(), Role::CustomerCare);
        assert_eq!(" Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn admin_dashboard_reads_nested_stats() {
        let body = json!({"success": true, "data": {"totalUsers": 120, "totalProducts": "35", "totalCourses": 12}});
        let dashboard = select_dashboard(Role::Admin, &body);
        assert_eq!(
            dashboard,
            Dashboard::Admin(AdminStats {
                users: 120,
                products: 35,
                courses: 12,
                jobs: 0,
                orders: 0,
            })
        );
        assert_eq!(dashboard.stat_cards()[0], StatCard { label: "Users", value: 120 });
    }

    #[test]
    fn instructor_dashboard_has_its_own_layout() {
        let body = json!({"stats": {"myCourses": 3, "myClassrooms": 5, "totalStudents": 88}});
        let dashboard = select_dashboard(Role::Instructor, &body);
        assert_eq!(dashboard.role(), Role::Instructor);
        let labels: Vec<&str> = dashboard.stat_cards().iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["My courses", "Classrooms", "Students"]);
    }

    #[test]
    fn dashboard_serializes_with_role_tag() {
        let dashboard = select_dashboard(Role::CustomerCare, &json!({"openTickets": 4}));
        let value = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(value["role"], "customerCare");
        assert_eq!(value["openTickets"], 4);
    }
}
