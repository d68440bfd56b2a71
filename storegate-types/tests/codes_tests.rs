use storegate_types::{ErrorCode, ResponseCode};

// ── ResponseCode ─────────────────────────────────────────────────

#[test]
fn response_codes_round_trip() {
    let codes = [
        ResponseCode::Licensed,
        ResponseCode::NotLicensed,
        ResponseCode::LicensedOldKey,
        ResponseCode::NotManaged,
        ResponseCode::ServerFailure,
        ResponseCode::OverQuota,
        ResponseCode::ErrorContactingServer,
        ResponseCode::ErrorInvalidPackageName,
        ResponseCode::ErrorNonMatchingAccount,
        ResponseCode::ErrorNotInstalled,
        ResponseCode::ErrorNotSupported,
    ];
    for code in codes {
        assert_eq!(ResponseCode::try_from(code.code()).unwrap(), code);
    }
}

#[test]
fn unknown_response_code_rejected() {
    assert!(ResponseCode::try_from(0x77).is_err());
    assert!(ResponseCode::try_from(-1).is_err());
}

#[test]
fn licensed_codes() {
    assert!(ResponseCode::Licensed.is_licensed());
    assert!(ResponseCode::LicensedOldKey.is_licensed());
    assert!(!ResponseCode::NotLicensed.is_licensed());
    assert!(!ResponseCode::ServerFailure.is_licensed());
}

#[test]
fn retryable_codes() {
    assert!(ResponseCode::ServerFailure.is_retryable());
    assert!(ResponseCode::OverQuota.is_retryable());
    assert!(ResponseCode::ErrorContactingServer.is_retryable());
    assert!(!ResponseCode::Licensed.is_retryable());
    assert!(!ResponseCode::NotLicensed.is_retryable());
    assert!(!ResponseCode::ErrorNotInstalled.is_retryable());
}

#[test]
fn response_code_serde_as_integer() {
    let json = serde_json::to_string(&ResponseCode::ErrorContactingServer).unwrap();
    assert_eq!(json, format!("{}", 0x101));
    let parsed: ResponseCode = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, ResponseCode::ErrorContactingServer);
}

#[test]
fn response_code_serde_rejects_unknown() {
    let parsed: Result<ResponseCode, _> = serde_json::from_str("512");
    assert!(parsed.is_err());
}

// ── ErrorCode ────────────────────────────────────────────────────

#[test]
fn error_codes_round_trip() {
    let codes = [
        ErrorCode::InvalidPackageName,
        ErrorCode::NonMatchingAccount,
        ErrorCode::NotManaged,
        ErrorCode::CheckInProgress,
        ErrorCode::InvalidPublicKey,
        ErrorCode::MissingPermission,
    ];
    for code in codes {
        assert_eq!(ErrorCode::try_from(code.code()).unwrap(), code);
    }
}

#[test]
fn error_codes_are_sequential() {
    assert_eq!(ErrorCode::InvalidPackageName.code(), 1);
    assert_eq!(ErrorCode::CheckInProgress.code(), 4);
    assert_eq!(ErrorCode::MissingPermission.code(), 6);
}

#[test]
fn unknown_error_code_rejected() {
    assert!(ErrorCode::try_from(0).is_err());
    assert!(ErrorCode::try_from(7).is_err());
}

#[test]
fn error_code_display() {
    assert_eq!(
        format!("{}", ErrorCode::InvalidPublicKey),
        "invalid public key"
    );
    assert_eq!(
        format!("{}", ErrorCode::CheckInProgress),
        "check already in progress"
    );
}
