//! Route tables for the five list-backed collections.

/// Endpoint paths for one collection.
///
/// `list` serves `?page&limit` windows ordered by recency, `{list}/{id}`
/// serves a single expanded record, and `count` returns `{"count": n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceRoutes {
    pub list: &'static str,
    pub count: &'static str,
}

pub const POSTS: ResourceRoutes = ResourceRoutes {
    list: "/posts",
    count: "/posts/count",
};

pub const POST_PROCESSES: ResourceRoutes = ResourceRoutes {
    list: "/posts/process",
    count: "/posts/process/count",
};

pub const COMMENTS: ResourceRoutes = ResourceRoutes {
    list: "/comments",
    count: "/comments/count",
};

pub const COMMENT_PROCESSES: ResourceRoutes = ResourceRoutes {
    list: "/comments/process",
    count: "/comments/process/count",
};

pub const REACTION_PROCESSES: ResourceRoutes = ResourceRoutes {
    list: "/reactions/process",
    count: "/reactions/process/count",
};
