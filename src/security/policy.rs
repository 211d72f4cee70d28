use crate::auth::{Principal, Role};

use super::PathPattern;

const PUBLIC_PATHS: &[&str] = &[
    "/api/user/notification/subscribe",
    "/api/common/version",
    "/api/common/health",
    "/api/oauth2/authorization/**",
    "/api/login/oauth2/code/**",
    "/api/auth/reissue",
    "/api/ingredient/search",
];

const SWAGGER_PATHS: &[&str] = &[
    "/swagger-ui/**",
    "/swagger-ui.html",
    "/api-docs/**",
    "/v3/api-docs/**",
];

const RECIPE_PUBLIC_PATHS: &[&str] = &[
    "/api/recipe/recommendations",
    "/api/recipe/search",
    "/api/recipe/{id}",
    "/api/image/optimize",
    "/api/recipe/{id}/comment",
    "/api/recipe/{id}/comment/count",
    "/api/recipe/{id}/like/count",
    "/api/recipe/{id}/like/notification/subscribe",
];

const COMMUNITY_PUBLIC_PATHS: &[&str] = &[
    "/api/community/{id}",
    "/api/community/{id}/comment",
    "/api/community/{id}/comment/count",
    "/api/community/{id}/like/count",
    "/api/community/{id}/like/notification/subscribe",
];

const USER_RECIPE_PUBLIC_PATHS: &[&str] = &[
    "/api/user-recipe/{id}",
    "/api/user-recipe/{id}/comment",
    "/api/user-recipe/{id}/comment/count",
    "/api/user-recipe/{id}/like/count",
    "/api/user-recipe/{id}/like/notification/subscribe",
];

const USER_ROLE_PATHS: &[&str] = &[
    "/api/recipe/{id}/comment/**",
    "/api/recipe/{id}/like/**",
    "/api/recipe/{id}/favorite/**",
    "/api/community/{id}/comment/**",
    "/api/community/{id}/like/**",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    PermitAll,
    HasRole(Role),
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    /// No principal on a protected path: answered by the 401 entry point
    Unauthenticated,
    Forbidden,
}

#[derive(Debug, Clone)]
struct Rule {
    patterns: Vec<PathPattern>,
    access: Access,
}

/// Ordered authorization rules. The first rule whose pattern matches decides;
/// paths no rule covers fall back to `any_request`.
#[derive(Debug, Clone)]
pub struct SecurityPolicy {
    rules: Vec<Rule>,
    any_request: Access,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        Self::new()
            .permit_all(
                [
                    PUBLIC_PATHS,
                    SWAGGER_PATHS,
                    RECIPE_PUBLIC_PATHS,
                    COMMUNITY_PUBLIC_PATHS,
                    USER_RECIPE_PUBLIC_PATHS,
                ]
                .concat(),
            )
            .has_role(USER_ROLE_PATHS, Role::User)
            .any_request(Access::Authenticated)
    }
}

impl SecurityPolicy {
    /// Empty policy that requires authentication everywhere.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            any_request: Access::Authenticated,
        }
    }

    pub fn permit_all<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rule(patterns, Access::PermitAll)
    }

    pub fn has_role<I, S>(self, patterns: I, role: Role) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.rule(patterns, Access::HasRole(role))
    }

    pub fn any_request(mut self, access: Access) -> Self {
        self.any_request = access;
        self
    }

    fn rule<I, S>(mut self, patterns: I, access: Access) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| PathPattern::parse(p.as_ref()))
            .collect();
        self.rules.push(Rule { patterns, access });
        self
    }

    pub fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.matches(path)))
            .map(|rule| rule.access)
            .unwrap_or(self.any_request)
    }

    pub fn decide(&self, path: &str, principal: Option<&Principal>) -> Decision {
        match (self.access_for(path), principal) {
            (Access::PermitAll, _) => Decision::Permit,
            (_, None) => Decision::Unauthenticated,
            (Access::Authenticated, Some(_)) => Decision::Permit,
            (Access::HasRole(role), Some(principal)) if principal.role == role => Decision::Permit,
            (Access::HasRole(_), Some(_)) => Decision::Forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> Principal {
        Principal {
            id: 1,
            email: "cook@nangpago.kr".to_string(),
            role,
        }
    }

    #[test]
    fn every_public_path_is_open_to_anonymous_callers() {
        let policy = SecurityPolicy::default();
        for path in [
            "/api/recipe/1",
            "/api/recipe/search",
            "/api/recipe/1/like/count",
            "/api/recipe/1/comment",
            "/api/recipe/1/comment/count",
            "/api/community/3",
            "/api/user-recipe/9/like/count",
            "/api/common/version",
            "/api/common/health",
            "/api/oauth2/authorization/google",
            "/api/login/oauth2/code/kakao",
            "/swagger-ui/index.html",
            "/api-docs/openapi.json",
            "/api/image/optimize",
        ] {
            assert_eq!(policy.decide(path, None), Decision::Permit, "{}", path);
        }
    }

    #[test]
    fn mutation_sub_paths_need_the_user_role() {
        let policy = SecurityPolicy::default();
        for path in [
            "/api/recipe/1/like/toggle",
            "/api/recipe/1/like/status",
            "/api/recipe/1/comment/5",
            "/api/recipe/1/favorite/toggle",
            "/api/community/1/comment/2",
            "/api/community/1/like/toggle",
        ] {
            assert_eq!(policy.access_for(path), Access::HasRole(Role::User), "{}", path);
            assert_eq!(policy.decide(path, None), Decision::Unauthenticated);
            assert_eq!(policy.decide(path, Some(&user(Role::User))), Decision::Permit);
            assert_eq!(policy.decide(path, Some(&user(Role::Admin))), Decision::Forbidden);
        }
    }

    #[test]
    fn first_match_wins_over_later_role_rule() {
        let policy = SecurityPolicy::default();
        // `/comment/**` also matches `/comment`, but the allow-list comes first
        assert_eq!(policy.access_for("/api/recipe/1/comment"), Access::PermitAll);
        assert_eq!(policy.access_for("/api/recipe/1/like/count"), Access::PermitAll);
    }

    #[test]
    fn everything_else_requires_authentication() {
        let policy = SecurityPolicy::default();
        assert_eq!(
            policy.decide("/api/recipe/bulk-upload/mysql", None),
            Decision::Unauthenticated
        );
        assert_eq!(
            policy.decide("/api/auth/status", Some(&user(Role::Admin))),
            Decision::Permit
        );
    }
}
