pub fn refresh_token_key(token: &str) -> String {
    format!("refresh_token:{}", token)
}

pub fn revoked_access_key(jti: &str) -> String {
    format!("revoked_access:{}", jti)
}
