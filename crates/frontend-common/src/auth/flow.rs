//! Login flow state machine
//!
//! Pure model of the email/OTP/admin-password login sequence. All I/O is
//! expressed as a pending [`FlowEffect`] for the hosting hook to launch;
//! responses come back as actions tagged with the generation that launched
//! them, and stale generations are dropped.

use pms_http::types::{AuthPayload, ChallengeStatus, OtpChallenge, User};

/// Tunable flow behavior
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlowConfig {
    /// Advisory lifetime of an emailed code, in seconds
    pub otp_ttl_secs: u32,
    /// Allow requesting a fresh code while the current one is still live
    pub resend_before_expiry: bool,
    /// Wipe the entered code after a failed verification
    pub clear_otp_on_failure: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            otp_ttl_secs: 300,
            resend_before_expiry: false,
            clear_otp_on_failure: false,
        }
    }
}

/// Where an in-flight OTP request came from, and thus where a failure
/// returns to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOrigin {
    EmailForm,
    Challenge { remaining: u32 },
    Expired,
}

/// Where a failed verification returns to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyOrigin {
    Otp { remaining: u32 },
    AdminPassword,
}

/// Current step of the login sequence
#[derive(Clone, Debug, PartialEq)]
pub enum FlowPhase {
    EnteringEmail,
    RequestingOtp {
        email: String,
        origin: RequestOrigin,
    },
    AdminPassword {
        email: String,
    },
    OtpRequested {
        email: String,
        remaining: u32,
    },
    OtpExpired {
        email: String,
    },
    Verifying {
        email: String,
        resume: VerifyOrigin,
    },
    Authenticated {
        user: User,
        token: String,
    },
}

/// Network work the hosting hook must launch
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEffect {
    RequestOtp {
        generation: u64,
        email: String,
    },
    VerifyOtp {
        generation: u64,
        email: String,
        otp: String,
    },
    AdminLogin {
        generation: u64,
        email: String,
        password: String,
    },
}

impl FlowEffect {
    pub fn generation(&self) -> u64 {
        match self {
            Self::RequestOtp { generation, .. }
            | Self::VerifyOtp { generation, .. }
            | Self::AdminLogin { generation, .. } => *generation,
        }
    }
}

/// Flow actions
#[derive(Clone, Debug)]
pub enum FlowAction {
    EmailChanged(String),
    OtpChanged(String),
    PasswordChanged(String),
    SubmitEmail,
    SubmitOtp,
    SubmitPassword,
    Resend,
    Tick,
    ClearError,
    StartOver,
    ChallengeAnswered {
        generation: u64,
        result: Result<OtpChallenge, String>,
    },
    VerifyAnswered {
        generation: u64,
        result: Result<AuthPayload, String>,
    },
}

/// Login flow state
#[derive(Clone, Debug, PartialEq)]
pub struct LoginFlow {
    config: FlowConfig,
    phase: FlowPhase,
    email_input: String,
    otp_input: String,
    password_input: String,
    error: Option<String>,
    generation: u64,
    pending: Option<FlowEffect>,
}

impl LoginFlow {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            phase: FlowPhase::EnteringEmail,
            email_input: String::new(),
            otp_input: String::new(),
            password_input: String::new(),
            error: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    pub fn phase(&self) -> &FlowPhase {
        &self.phase
    }

    pub fn email_input(&self) -> &str {
        &self.email_input
    }

    pub fn otp_input(&self) -> &str {
        &self.otp_input
    }

    pub fn password_input(&self) -> &str {
        &self.password_input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The effect the hosting hook must launch, if any
    pub fn pending(&self) -> Option<&FlowEffect> {
        self.pending.as_ref()
    }

    /// Seconds left on the live challenge, if one is counting down
    pub fn remaining(&self) -> Option<u32> {
        match &self.phase {
            FlowPhase::OtpRequested { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    /// Whether the one-second countdown should be running
    pub fn counting(&self) -> bool {
        matches!(&self.phase, FlowPhase::OtpRequested { remaining, .. } if *remaining > 0)
    }

    /// Whether a fresh code may be requested right now
    pub fn can_resend(&self) -> bool {
        match &self.phase {
            FlowPhase::OtpRequested { remaining, .. } => {
                *remaining == 0 || self.config.resend_before_expiry
            }
            FlowPhase::OtpExpired { .. } => true,
            _ => false,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Apply an action. Any network work it implies is left in `pending`.
    pub fn apply(&mut self, action: FlowAction) {
        self.pending = None;
        match action {
            FlowAction::EmailChanged(value) => {
                self.email_input = value;
            }
            FlowAction::OtpChanged(value) => {
                // Keep only the first six digits, mirroring the input mask
                self.otp_input = value.chars().filter(char::is_ascii_digit).take(6).collect();
            }
            FlowAction::PasswordChanged(value) => {
                self.password_input = value;
            }
            FlowAction::SubmitEmail => self.submit_email(),
            FlowAction::SubmitOtp => self.submit_otp(),
            FlowAction::SubmitPassword => self.submit_password(),
            FlowAction::Resend => self.resend(),
            FlowAction::Tick => self.tick(),
            FlowAction::ClearError => {
                self.error = None;
            }
            FlowAction::StartOver => {
                // Invalidate any in-flight responses along with the step
                self.next_generation();
                self.phase = FlowPhase::EnteringEmail;
                self.otp_input.clear();
                self.password_input.clear();
                self.error = None;
            }
            FlowAction::ChallengeAnswered { generation, result } => {
                self.challenge_answered(generation, result);
            }
            FlowAction::VerifyAnswered { generation, result } => {
                self.verify_answered(generation, result);
            }
        }
    }

    fn submit_email(&mut self) {
        if !matches!(self.phase, FlowPhase::EnteringEmail) {
            return;
        }
        let email = self.email_input.trim().to_string();
        if !email.contains('@') {
            self.error = Some("Please enter a valid email address".to_string());
            return;
        }
        self.error = None;
        let generation = self.next_generation();
        self.phase = FlowPhase::RequestingOtp {
            email: email.clone(),
            origin: RequestOrigin::EmailForm,
        };
        self.pending = Some(FlowEffect::RequestOtp { generation, email });
    }

    fn submit_otp(&mut self) {
        let (email, remaining) = match &self.phase {
            FlowPhase::OtpRequested { email, remaining } => (email.clone(), *remaining),
            _ => return,
        };
        if self.otp_input.len() != 6 || !self.otp_input.chars().all(|c| c.is_ascii_digit()) {
            self.error = Some("Enter the 6-digit code from your email".to_string());
            return;
        }
        self.error = None;
        let generation = self.next_generation();
        self.phase = FlowPhase::Verifying {
            email: email.clone(),
            resume: VerifyOrigin::Otp { remaining },
        };
        self.pending = Some(FlowEffect::VerifyOtp {
            generation,
            email,
            otp: self.otp_input.clone(),
        });
    }

    fn submit_password(&mut self) {
        let email = match &self.phase {
            FlowPhase::AdminPassword { email } => email.clone(),
            _ => return,
        };
        if self.password_input.is_empty() {
            self.error = Some("Enter your password".to_string());
            return;
        }
        self.error = None;
        let generation = self.next_generation();
        self.phase = FlowPhase::Verifying {
            email: email.clone(),
            resume: VerifyOrigin::AdminPassword,
        };
        self.pending = Some(FlowEffect::AdminLogin {
            generation,
            email,
            password: self.password_input.clone(),
        });
    }

    fn resend(&mut self) {
        let (email, origin) = match &self.phase {
            FlowPhase::OtpRequested { email, remaining } => {
                if *remaining > 0 && !self.config.resend_before_expiry {
                    self.error =
                        Some("Wait for the current code to expire before requesting a new one"
                            .to_string());
                    return;
                }
                (
                    email.clone(),
                    RequestOrigin::Challenge {
                        remaining: *remaining,
                    },
                )
            }
            FlowPhase::OtpExpired { email } => (email.clone(), RequestOrigin::Expired),
            _ => return,
        };
        self.error = None;
        let generation = self.next_generation();
        self.phase = FlowPhase::RequestingOtp {
            email: email.clone(),
            origin,
        };
        self.pending = Some(FlowEffect::RequestOtp { generation, email });
    }

    fn tick(&mut self) {
        if let FlowPhase::OtpRequested { email, remaining } = &mut self.phase {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.phase = FlowPhase::OtpExpired {
                    email: email.clone(),
                };
            }
        }
    }

    fn challenge_answered(&mut self, generation: u64, result: Result<OtpChallenge, String>) {
        if generation != self.generation {
            return;
        }
        let origin = match &self.phase {
            FlowPhase::RequestingOtp { origin, .. } => origin.clone(),
            _ => return,
        };
        let email = match &self.phase {
            FlowPhase::RequestingOtp { email, .. } => email.clone(),
            _ => return,
        };
        match result {
            Ok(challenge) => match challenge.status {
                ChallengeStatus::OtpSent => {
                    self.otp_input.clear();
                    self.phase = FlowPhase::OtpRequested {
                        email,
                        remaining: self.config.otp_ttl_secs,
                    };
                }
                ChallengeStatus::Admin => {
                    self.password_input.clear();
                    self.phase = FlowPhase::AdminPassword { email };
                }
            },
            Err(message) => {
                self.error = Some(message);
                self.phase = match origin {
                    RequestOrigin::EmailForm => FlowPhase::EnteringEmail,
                    RequestOrigin::Challenge { remaining } => {
                        FlowPhase::OtpRequested { email, remaining }
                    }
                    RequestOrigin::Expired => FlowPhase::OtpExpired { email },
                };
            }
        }
    }

    fn verify_answered(&mut self, generation: u64, result: Result<AuthPayload, String>) {
        if generation != self.generation {
            return;
        }
        let (email, resume) = match &self.phase {
            FlowPhase::Verifying { email, resume } => (email.clone(), resume.clone()),
            _ => return,
        };
        match result {
            Ok(payload) => {
                self.otp_input.clear();
                self.password_input.clear();
                self.error = None;
                self.phase = FlowPhase::Authenticated {
                    user: payload.user,
                    token: payload.token,
                };
            }
            Err(message) => {
                self.error = Some(message);
                self.phase = match resume {
                    VerifyOrigin::Otp { remaining } => {
                        if self.config.clear_otp_on_failure {
                            self.otp_input.clear();
                        }
                        FlowPhase::OtpRequested { email, remaining }
                    }
                    VerifyOrigin::AdminPassword => FlowPhase::AdminPassword { email },
                };
            }
        }
    }
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pms_http::types::Role;

    fn flow() -> LoginFlow {
        LoginFlow::default()
    }

    fn student_payload() -> AuthPayload {
        AuthPayload {
            user: User {
                id: "u-1".to_string(),
                email: "sam@campus.edu".to_string(),
                name: "Sam".to_string(),
                role: Role::Student,
                created_at: Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap(),
            },
            token: "tok".to_string(),
        }
    }

    fn otp_sent(email: &str) -> OtpChallenge {
        OtpChallenge {
            status: ChallengeStatus::OtpSent,
            email: email.to_string(),
        }
    }

    fn to_otp_requested(flow: &mut LoginFlow, email: &str) {
        flow.apply(FlowAction::EmailChanged(email.to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Ok(otp_sent(email)),
        });
    }

    #[test]
    fn email_without_at_sign_never_reaches_the_network() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("not-an-email".to_string()));
        flow.apply(FlowAction::SubmitEmail);

        assert!(flow.pending().is_none());
        assert!(flow.error().is_some());
        assert_eq!(*flow.phase(), FlowPhase::EnteringEmail);
    }

    #[test]
    fn valid_email_launches_an_otp_request() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("  sam@campus.edu ".to_string()));
        flow.apply(FlowAction::SubmitEmail);

        match flow.pending() {
            Some(FlowEffect::RequestOtp { email, .. }) => assert_eq!(email, "sam@campus.edu"),
            other => panic!("expected RequestOtp, got {other:?}"),
        }
    }

    #[test]
    fn otp_sent_starts_the_countdown_at_the_configured_ttl() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");

        assert_eq!(flow.remaining(), Some(300));
        assert!(flow.counting());
    }

    #[test]
    fn admin_status_branches_to_the_password_step() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("root@campus.edu".to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Ok(OtpChallenge {
                status: ChallengeStatus::Admin,
                email: "root@campus.edu".to_string(),
            }),
        });

        assert_eq!(
            *flow.phase(),
            FlowPhase::AdminPassword {
                email: "root@campus.edu".to_string()
            }
        );
    }

    #[test]
    fn stale_challenge_responses_are_dropped() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("sam@campus.edu".to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let stale = flow.pending().unwrap().generation();

        flow.apply(FlowAction::StartOver);
        flow.apply(FlowAction::ChallengeAnswered {
            generation: stale,
            result: Ok(otp_sent("sam@campus.edu")),
        });

        assert_eq!(*flow.phase(), FlowPhase::EnteringEmail);
    }

    #[test]
    fn stale_verify_responses_are_dropped() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::OtpChanged("123456".to_string()));
        flow.apply(FlowAction::SubmitOtp);
        let stale = flow.pending().unwrap().generation();

        flow.apply(FlowAction::StartOver);
        flow.apply(FlowAction::VerifyAnswered {
            generation: stale,
            result: Ok(student_payload()),
        });

        assert_eq!(*flow.phase(), FlowPhase::EnteringEmail);
    }

    #[test]
    fn countdown_saturates_at_zero_and_expires() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");

        for _ in 0..300 {
            flow.apply(FlowAction::Tick);
        }
        assert_eq!(
            *flow.phase(),
            FlowPhase::OtpExpired {
                email: "sam@campus.edu".to_string()
            }
        );

        // Extra ticks change nothing
        flow.apply(FlowAction::Tick);
        assert_eq!(
            *flow.phase(),
            FlowPhase::OtpExpired {
                email: "sam@campus.edu".to_string()
            }
        );
        assert!(!flow.counting());
    }

    #[test]
    fn otp_input_keeps_only_the_first_six_digits() {
        let mut flow = flow();
        flow.apply(FlowAction::OtpChanged("12a34-5678".to_string()));
        assert_eq!(flow.otp_input(), "123456");
    }

    #[test]
    fn short_otp_is_rejected_without_a_network_call() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::OtpChanged("123".to_string()));
        flow.apply(FlowAction::SubmitOtp);

        assert!(flow.pending().is_none());
        assert!(flow.error().is_some());
    }

    #[test]
    fn successful_verify_is_terminal() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::OtpChanged("123456".to_string()));
        flow.apply(FlowAction::SubmitOtp);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::VerifyAnswered {
            generation,
            result: Ok(student_payload()),
        });

        match flow.phase() {
            FlowPhase::Authenticated { user, token } => {
                assert_eq!(user.role, Role::Student);
                assert_eq!(token, "tok");
            }
            other => panic!("expected Authenticated, got {other:?}"),
        }
    }

    #[test]
    fn failed_verify_returns_to_the_challenge_and_keeps_the_code() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::OtpChanged("123456".to_string()));
        flow.apply(FlowAction::SubmitOtp);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::VerifyAnswered {
            generation,
            result: Err("Invalid or expired OTP".to_string()),
        });

        assert!(matches!(flow.phase(), FlowPhase::OtpRequested { .. }));
        assert_eq!(flow.error(), Some("Invalid or expired OTP"));
        assert_eq!(flow.otp_input(), "123456");
    }

    #[test]
    fn failed_verify_clears_the_code_when_configured() {
        let mut flow = LoginFlow::new(FlowConfig {
            clear_otp_on_failure: true,
            ..FlowConfig::default()
        });
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::OtpChanged("123456".to_string()));
        flow.apply(FlowAction::SubmitOtp);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::VerifyAnswered {
            generation,
            result: Err("Invalid or expired OTP".to_string()),
        });

        assert_eq!(flow.otp_input(), "");
    }

    #[test]
    fn resend_is_rejected_while_the_code_is_live_by_default() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        flow.apply(FlowAction::Resend);

        assert!(flow.pending().is_none());
        assert!(flow.error().is_some());
        assert!(!flow.can_resend());
    }

    #[test]
    fn resend_before_expiry_is_a_configuration_choice() {
        let mut flow = LoginFlow::new(FlowConfig {
            resend_before_expiry: true,
            ..FlowConfig::default()
        });
        to_otp_requested(&mut flow, "sam@campus.edu");
        assert!(flow.can_resend());
        flow.apply(FlowAction::Resend);

        assert!(matches!(
            flow.pending(),
            Some(FlowEffect::RequestOtp { .. })
        ));
    }

    #[test]
    fn resend_after_expiry_replaces_the_challenge() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        for _ in 0..300 {
            flow.apply(FlowAction::Tick);
        }
        assert!(flow.can_resend());

        flow.apply(FlowAction::Resend);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Ok(otp_sent("sam@campus.edu")),
        });

        assert_eq!(flow.remaining(), Some(300));
    }

    #[test]
    fn failed_resend_falls_back_to_the_expired_step() {
        let mut flow = flow();
        to_otp_requested(&mut flow, "sam@campus.edu");
        for _ in 0..300 {
            flow.apply(FlowAction::Tick);
        }
        flow.apply(FlowAction::Resend);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Err("Too many requests".to_string()),
        });

        assert_eq!(
            *flow.phase(),
            FlowPhase::OtpExpired {
                email: "sam@campus.edu".to_string()
            }
        );
        assert_eq!(flow.error(), Some("Too many requests"));
    }

    #[test]
    fn failed_otp_request_returns_to_the_email_form() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("ghost@campus.edu".to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Err("User not found".to_string()),
        });

        assert_eq!(*flow.phase(), FlowPhase::EnteringEmail);
        assert_eq!(flow.error(), Some("User not found"));
    }

    #[test]
    fn empty_password_is_rejected_locally() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("root@campus.edu".to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Ok(OtpChallenge {
                status: ChallengeStatus::Admin,
                email: "root@campus.edu".to_string(),
            }),
        });

        flow.apply(FlowAction::SubmitPassword);
        assert!(flow.pending().is_none());
        assert!(flow.error().is_some());
    }

    #[test]
    fn failed_admin_login_returns_to_the_password_step() {
        let mut flow = flow();
        flow.apply(FlowAction::EmailChanged("root@campus.edu".to_string()));
        flow.apply(FlowAction::SubmitEmail);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::ChallengeAnswered {
            generation,
            result: Ok(OtpChallenge {
                status: ChallengeStatus::Admin,
                email: "root@campus.edu".to_string(),
            }),
        });
        flow.apply(FlowAction::PasswordChanged("wrong".to_string()));
        flow.apply(FlowAction::SubmitPassword);
        let generation = flow.pending().unwrap().generation();
        flow.apply(FlowAction::VerifyAnswered {
            generation,
            result: Err("Invalid credentials".to_string()),
        });

        assert_eq!(
            *flow.phase(),
            FlowPhase::AdminPassword {
                email: "root@campus.edu".to_string()
            }
        );
    }
}
