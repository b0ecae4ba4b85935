//! Typed form data for the login and signup flows.

use std::collections::BTreeMap;
use std::fmt;

use secrecy::SecretString;

/// Which form the user is filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    /// Rate limit action key used when this form is submitted.
    pub fn action(self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }
}

/// Whether the user identifies with an email address or a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginType {
    Email,
    Phone,
}

/// A form field, ordered the way the fields are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Password,
    ConfirmPassword,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
            Field::ConfirmPassword => "confirmPassword",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifier the user logs in with. The variant is the login type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    Email(String),
    Phone(String),
}

impl Credential {
    pub fn empty(login_type: LoginType) -> Self {
        match login_type {
            LoginType::Email => Credential::Email(String::new()),
            LoginType::Phone => Credential::Phone(String::new()),
        }
    }

    pub fn login_type(&self) -> LoginType {
        match self {
            Credential::Email(_) => LoginType::Email,
            Credential::Phone(_) => LoginType::Phone,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Credential::Email(_) => Field::Email,
            Credential::Phone(_) => Field::Phone,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Credential::Email(v) | Credential::Phone(v) => v,
        }
    }

    fn value_mut(&mut self) -> &mut String {
        match self {
            Credential::Email(v) | Credential::Phone(v) => v,
        }
    }
}

/// Fields of the login form.
#[derive(Debug)]
pub struct LoginFields {
    pub credential: Credential,
    pub password: SecretString,
}

impl LoginFields {
    pub fn new(credential: Credential, password: &str) -> Self {
        Self {
            credential,
            password: secret(password),
        }
    }
}

/// Fields of the signup form.
#[derive(Debug)]
pub struct SignupFields {
    pub credential: Credential,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub name: String,
}

impl SignupFields {
    pub fn new(credential: Credential, password: &str, confirm_password: &str, name: &str) -> Self {
        Self {
            credential,
            password: secret(password),
            confirm_password: secret(confirm_password),
            name: name.to_string(),
        }
    }
}

/// A form snapshot. The variant is the auth mode.
#[derive(Debug)]
pub enum AuthForm {
    Login(LoginFields),
    Signup(SignupFields),
}

impl AuthForm {
    /// An empty form for the given mode and login type.
    pub fn empty(mode: AuthMode, login_type: LoginType) -> Self {
        let credential = Credential::empty(login_type);
        match mode {
            AuthMode::Login => AuthForm::Login(LoginFields::new(credential, "")),
            AuthMode::Signup => AuthForm::Signup(SignupFields::new(credential, "", "", "")),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            AuthForm::Login(_) => AuthMode::Login,
            AuthForm::Signup(_) => AuthMode::Signup,
        }
    }

    pub fn credential(&self) -> &Credential {
        match self {
            AuthForm::Login(f) => &f.credential,
            AuthForm::Signup(f) => &f.credential,
        }
    }

    pub fn login_type(&self) -> LoginType {
        self.credential().login_type()
    }

    pub fn password(&self) -> &SecretString {
        match self {
            AuthForm::Login(f) => &f.password,
            AuthForm::Signup(f) => &f.password,
        }
    }

    /// Fields present on this form, in layout order.
    pub fn fields(&self) -> Vec<Field> {
        let credential = self.credential().field();
        match self {
            AuthForm::Login(_) => vec![credential, Field::Password],
            AuthForm::Signup(_) => vec![
                Field::Name,
                credential,
                Field::Password,
                Field::ConfirmPassword,
            ],
        }
    }

    /// Replaces the value of `field`.
    ///
    /// Returns `false` when the field is not part of this form, e.g. `Phone`
    /// on an email login or `Name` on the login form.
    pub fn set(&mut self, field: Field, value: &str) -> bool {
        let credential_field = self.credential().field();
        match (self, field) {
            (AuthForm::Login(f), fld) if fld == credential_field => {
                set_string(f.credential.value_mut(), value)
            }
            (AuthForm::Signup(f), fld) if fld == credential_field => {
                set_string(f.credential.value_mut(), value)
            }
            (AuthForm::Login(f), Field::Password) => {
                f.password = secret(value);
                true
            }
            (AuthForm::Signup(f), Field::Password) => {
                f.password = secret(value);
                true
            }
            (AuthForm::Signup(f), Field::ConfirmPassword) => {
                f.confirm_password = secret(value);
                true
            }
            (AuthForm::Signup(f), Field::Name) => set_string(&mut f.name, value),
            _ => false,
        }
    }

    /// Swaps the credential to `login_type`, discarding the old value.
    pub fn set_login_type(&mut self, login_type: LoginType) {
        let credential = match self {
            AuthForm::Login(f) => &mut f.credential,
            AuthForm::Signup(f) => &mut f.credential,
        };
        if credential.login_type() != login_type {
            *credential = Credential::empty(login_type);
        }
    }
}

fn set_string(target: &mut String, value: &str) -> bool {
    target.clear();
    target.push_str(value);
    true
}

fn secret(value: &str) -> SecretString {
    SecretString::new(value.to_string().into())
}

/// Per-field error messages. Valid fields have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.errors.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}
