//! RPC functions as `struct`s implementing [`RemoteCall`].
//!
//! Unlike bare types, functions serialize their own constructor ID: the
//! session sends them as complete message bodies.

use crate::{enums, Identifiable, RemoteCall, Serializable};

macro_rules! impl_identifiable {
    ($ty:ty, $id:expr) => {
        impl Identifiable for $ty {
            const CONSTRUCTOR_ID: u32 = $id;
        }
    };
}

// ─── Key exchange ────────────────────────────────────────────────────────────

/// `req_pq#60469778`
#[derive(Clone, Debug, PartialEq)]
pub struct ReqPq {
    pub nonce: [u8; 16],
}
impl_identifiable!(ReqPq, 0x60469778);

impl Serializable for ReqPq {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
    }
}

impl RemoteCall for ReqPq {
    type Return = enums::ResPq;
}

/// `req_DH_params#d712e4be`
#[derive(Clone, Debug, PartialEq)]
pub struct ReqDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub public_key_fingerprint: i64,
    pub encrypted_data: Vec<u8>,
}
impl_identifiable!(ReqDhParams, 0xd712e4be);

impl Serializable for ReqDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.public_key_fingerprint.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for ReqDhParams {
    type Return = enums::ServerDhParams;
}

/// `set_client_DH_params#f5045f1f`
#[derive(Clone, Debug, PartialEq)]
pub struct SetClientDhParams {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_data: Vec<u8>,
}
impl_identifiable!(SetClientDhParams, 0xf5045f1f);

impl Serializable for SetClientDhParams {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_data.serialize(buf);
    }
}

impl RemoteCall for SetClientDhParams {
    type Return = enums::SetClientDhParamsAnswer;
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// `ping#7abe77ec`
#[derive(Clone, Debug, PartialEq)]
pub struct Ping {
    pub ping_id: i64,
}
impl_identifiable!(Ping, 0x7abe77ec);

impl Serializable for Ping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl RemoteCall for Ping {
    type Return = enums::Pong;
}

// ─── Wrappers ────────────────────────────────────────────────────────────────

/// `invokeWithLayer#da9b0d0d`
#[derive(Clone, Debug, PartialEq)]
pub struct InvokeWithLayer<Q> {
    pub layer: i32,
    pub query: Q,
}
impl<Q> Identifiable for InvokeWithLayer<Q> {
    const CONSTRUCTOR_ID: u32 = 0xda9b0d0d;
}

impl<Q: Serializable> Serializable for InvokeWithLayer<Q> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.layer.serialize(buf);
        self.query.serialize(buf);
    }
}

impl<Q: RemoteCall> RemoteCall for InvokeWithLayer<Q> {
    type Return = Q::Return;
}

/// `initConnection#69796de9`
#[derive(Clone, Debug, PartialEq)]
pub struct InitConnection<Q> {
    pub api_id: i32,
    pub device_model: String,
    pub system_version: String,
    pub app_version: String,
    pub lang_code: String,
    pub query: Q,
}
impl<Q> Identifiable for InitConnection<Q> {
    const CONSTRUCTOR_ID: u32 = 0x69796de9;
}

impl<Q: Serializable> Serializable for InitConnection<Q> {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        Self::CONSTRUCTOR_ID.serialize(buf);
        self.api_id.serialize(buf);
        self.device_model.serialize(buf);
        self.system_version.serialize(buf);
        self.app_version.serialize(buf);
        self.lang_code.serialize(buf);
        self.query.serialize(buf);
    }
}

impl<Q: RemoteCall> RemoteCall for InitConnection<Q> {
    type Return = Q::Return;
}

// ─── help ────────────────────────────────────────────────────────────────────

pub mod help {
    use super::*;

    /// `help.getConfig#c4f9186b`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetConfig {}
    impl_identifiable!(GetConfig, 0xc4f9186b);

    impl Serializable for GetConfig {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetConfig {
        type Return = enums::Config;
    }
}

// ─── auth ────────────────────────────────────────────────────────────────────

pub mod auth {
    use super::*;

    /// `auth.sendCode#768d5f4d`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SendCode {
        pub phone_number: String,
        pub sms_type: i32,
        pub api_id: i32,
        pub api_hash: String,
        pub lang_code: String,
    }
    impl_identifiable!(SendCode, 0x768d5f4d);

    impl Serializable for SendCode {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.phone_number.serialize(buf);
            self.sms_type.serialize(buf);
            self.api_id.serialize(buf);
            self.api_hash.serialize(buf);
            self.lang_code.serialize(buf);
        }
    }

    impl RemoteCall for SendCode {
        type Return = enums::auth::SentCode;
    }

    /// `auth.signIn#bcd51581`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SignIn {
        pub phone_number: String,
        pub phone_code_hash: String,
        pub phone_code: String,
    }
    impl_identifiable!(SignIn, 0xbcd51581);

    impl Serializable for SignIn {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.phone_number.serialize(buf);
            self.phone_code_hash.serialize(buf);
            self.phone_code.serialize(buf);
        }
    }

    impl RemoteCall for SignIn {
        type Return = enums::auth::Authorization;
    }

    /// `auth.exportAuthorization#e5bfffcd`
    #[derive(Clone, Debug, PartialEq)]
    pub struct ExportAuthorization {
        pub dc_id: i32,
    }
    impl_identifiable!(ExportAuthorization, 0xe5bfffcd);

    impl Serializable for ExportAuthorization {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.dc_id.serialize(buf);
        }
    }

    impl RemoteCall for ExportAuthorization {
        type Return = enums::auth::ExportedAuthorization;
    }

    /// `auth.importAuthorization#e3ef9613`
    #[derive(Clone, Debug, PartialEq)]
    pub struct ImportAuthorization {
        pub id: i32,
        pub bytes: Vec<u8>,
    }
    impl_identifiable!(ImportAuthorization, 0xe3ef9613);

    impl Serializable for ImportAuthorization {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.id.serialize(buf);
            self.bytes.serialize(buf);
        }
    }

    impl RemoteCall for ImportAuthorization {
        type Return = enums::auth::Authorization;
    }
}

// ─── account ─────────────────────────────────────────────────────────────────

pub mod account {
    use super::*;

    /// `account.getPassword#548a30f5`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetPassword {}
    impl_identifiable!(GetPassword, 0x548a30f5);

    impl Serializable for GetPassword {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetPassword {
        type Return = enums::account::Password;
    }
}

// ─── users ───────────────────────────────────────────────────────────────────

pub mod users {
    use super::*;

    /// `users.getUsers#0d91a548`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetUsers {
        pub id: Vec<enums::InputUser>,
    }
    impl_identifiable!(GetUsers, 0x0d91a548);

    impl Serializable for GetUsers {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.id.serialize(buf);
        }
    }

    impl RemoteCall for GetUsers {
        type Return = Vec<enums::User>;
    }
}

// ─── contacts ────────────────────────────────────────────────────────────────

pub mod contacts {
    use super::*;

    /// `contacts.getContacts#22c6aa08`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetContacts {
        pub hash: String,
    }
    impl_identifiable!(GetContacts, 0x22c6aa08);

    impl Serializable for GetContacts {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.hash.serialize(buf);
        }
    }

    impl RemoteCall for GetContacts {
        type Return = enums::contacts::Contacts;
    }
}

// ─── messages ────────────────────────────────────────────────────────────────

pub mod messages {
    use super::*;

    /// `messages.getChats#3c6aa187`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetChats {
        pub id: Vec<i32>,
    }
    impl_identifiable!(GetChats, 0x3c6aa187);

    impl Serializable for GetChats {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.id.serialize(buf);
        }
    }

    impl RemoteCall for GetChats {
        type Return = enums::messages::Chats;
    }

    /// `messages.setTyping#a3825e50`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SetTyping {
        pub peer: enums::InputPeer,
        pub action: enums::SendMessageAction,
    }
    impl_identifiable!(SetTyping, 0xa3825e50);

    impl Serializable for SetTyping {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.peer.serialize(buf);
            self.action.serialize(buf);
        }
    }

    impl RemoteCall for SetTyping {
        type Return = bool;
    }
}

// ─── updates ─────────────────────────────────────────────────────────────────

pub mod updates {
    use super::*;

    /// `updates.getState#edd4882a`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetState {}
    impl_identifiable!(GetState, 0xedd4882a);

    impl Serializable for GetState {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
        }
    }

    impl RemoteCall for GetState {
        type Return = enums::updates::State;
    }

    /// `updates.getDifference#0a041495`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetDifference {
        pub pts: u32,
        pub date: u32,
        pub qts: u32,
    }
    impl_identifiable!(GetDifference, 0x0a041495);

    impl Serializable for GetDifference {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.pts.serialize(buf);
            self.date.serialize(buf);
            self.qts.serialize(buf);
        }
    }

    impl RemoteCall for GetDifference {
        type Return = enums::updates::Difference;
    }
}

// ─── upload ──────────────────────────────────────────────────────────────────

pub mod upload {
    use super::*;

    /// `upload.saveFilePart#b304a621`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SaveFilePart {
        pub file_id: i64,
        pub file_part: i32,
        pub bytes: Vec<u8>,
    }
    impl_identifiable!(SaveFilePart, 0xb304a621);

    impl Serializable for SaveFilePart {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.file_id.serialize(buf);
            self.file_part.serialize(buf);
            self.bytes.serialize(buf);
        }
    }

    impl RemoteCall for SaveFilePart {
        type Return = bool;
    }

    /// `upload.saveBigFilePart#de7b673d`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SaveBigFilePart {
        pub file_id: i64,
        pub file_part: i32,
        pub file_total_parts: i32,
        pub bytes: Vec<u8>,
    }
    impl_identifiable!(SaveBigFilePart, 0xde7b673d);

    impl Serializable for SaveBigFilePart {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.file_id.serialize(buf);
            self.file_part.serialize(buf);
            self.file_total_parts.serialize(buf);
            self.bytes.serialize(buf);
        }
    }

    impl RemoteCall for SaveBigFilePart {
        type Return = bool;
    }

    /// `upload.getFile#e3a6cfb5`
    #[derive(Clone, Debug, PartialEq)]
    pub struct GetFile {
        pub location: enums::InputFileLocation,
        pub offset: i32,
        pub limit: i32,
    }
    impl_identifiable!(GetFile, 0xe3a6cfb5);

    impl Serializable for GetFile {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            Self::CONSTRUCTOR_ID.serialize(buf);
            self.location.serialize(buf);
            self.offset.serialize(buf);
            self.limit.serialize(buf);
        }
    }

    impl RemoteCall for GetFile {
        type Return = enums::upload::File;
    }
}
