//! Static dashboard markup. All data is fetched client-side from `/api/jobs`.

pub(crate) const JOBS_PAGE: &str = include_str!("../assets/jobs.html");
