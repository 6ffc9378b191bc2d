//! Concrete constructors (bare types) as `struct`s.
//!
//! Serialization here covers the *fields only*; the 32-bit constructor ID
//! is written by the owning boxed enum (or by the caller for the few
//! service messages the session emits directly).

use crate::deserialize::{Buffer, Result};
use crate::{enums, Deserializable, Identifiable, Serializable};

macro_rules! impl_identifiable {
    ($ty:ty, $id:expr) => {
        impl Identifiable for $ty {
            const CONSTRUCTOR_ID: u32 = $id;
        }
    };
}

// ─── Key exchange ────────────────────────────────────────────────────────────

/// `resPQ#05162463`
#[derive(Clone, Debug, PartialEq)]
pub struct ResPq {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub pq: Vec<u8>,
    pub server_public_key_fingerprints: Vec<i64>,
}
impl_identifiable!(ResPq, 0x05162463);

impl Serializable for ResPq {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.pq.serialize(buf);
        self.server_public_key_fingerprints.serialize(buf);
    }
}

impl Deserializable for ResPq {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            pq: Vec::<u8>::deserialize(buf)?,
            server_public_key_fingerprints: Vec::<i64>::deserialize(buf)?,
        })
    }
}

/// `p_q_inner_data#83c95aec`
#[derive(Clone, Debug, PartialEq)]
pub struct PQInnerData {
    pub pq: Vec<u8>,
    pub p: Vec<u8>,
    pub q: Vec<u8>,
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce: [u8; 32],
}
impl_identifiable!(PQInnerData, 0x83c95aec);

impl Serializable for PQInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.pq.serialize(buf);
        self.p.serialize(buf);
        self.q.serialize(buf);
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce.serialize(buf);
    }
}

impl Deserializable for PQInnerData {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            pq: Vec::<u8>::deserialize(buf)?,
            p: Vec::<u8>::deserialize(buf)?,
            q: Vec::<u8>::deserialize(buf)?,
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            new_nonce: <[u8; 32]>::deserialize(buf)?,
        })
    }
}

/// `server_DH_params_ok#d0e8075c`
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhParamsOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub encrypted_answer: Vec<u8>,
}
impl_identifiable!(ServerDhParamsOk, 0xd0e8075c);

impl Serializable for ServerDhParamsOk {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.encrypted_answer.serialize(buf);
    }
}

impl Deserializable for ServerDhParamsOk {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            encrypted_answer: Vec::<u8>::deserialize(buf)?,
        })
    }
}

/// `server_DH_params_fail#79cb045d`
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhParamsFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash: [u8; 16],
}
impl_identifiable!(ServerDhParamsFail, 0x79cb045d);

impl Serializable for ServerDhParamsFail {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash.serialize(buf);
    }
}

impl Deserializable for ServerDhParamsFail {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            new_nonce_hash: <[u8; 16]>::deserialize(buf)?,
        })
    }
}

/// `server_DH_inner_data#b5890dba`
#[derive(Clone, Debug, PartialEq)]
pub struct ServerDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub g: i32,
    pub dh_prime: Vec<u8>,
    pub g_a: Vec<u8>,
    pub server_time: i32,
}
impl_identifiable!(ServerDhInnerData, 0xb5890dba);

impl Serializable for ServerDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.g.serialize(buf);
        self.dh_prime.serialize(buf);
        self.g_a.serialize(buf);
        self.server_time.serialize(buf);
    }
}

impl Deserializable for ServerDhInnerData {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            g: i32::deserialize(buf)?,
            dh_prime: Vec::<u8>::deserialize(buf)?,
            g_a: Vec::<u8>::deserialize(buf)?,
            server_time: i32::deserialize(buf)?,
        })
    }
}

/// `client_DH_inner_data#6643b654`
#[derive(Clone, Debug, PartialEq)]
pub struct ClientDhInnerData {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub retry_id: i64,
    pub g_b: Vec<u8>,
}
impl_identifiable!(ClientDhInnerData, 0x6643b654);

impl Serializable for ClientDhInnerData {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.retry_id.serialize(buf);
        self.g_b.serialize(buf);
    }
}

impl Deserializable for ClientDhInnerData {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            retry_id: i64::deserialize(buf)?,
            g_b: Vec::<u8>::deserialize(buf)?,
        })
    }
}

/// `dh_gen_ok#3bcbf734`
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenOk {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash1: [u8; 16],
}
impl_identifiable!(DhGenOk, 0x3bcbf734);

impl Serializable for DhGenOk {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash1.serialize(buf);
    }
}

impl Deserializable for DhGenOk {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            new_nonce_hash1: <[u8; 16]>::deserialize(buf)?,
        })
    }
}

/// `dh_gen_retry#46dc1fb9`
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenRetry {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash2: [u8; 16],
}
impl_identifiable!(DhGenRetry, 0x46dc1fb9);

impl Serializable for DhGenRetry {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash2.serialize(buf);
    }
}

impl Deserializable for DhGenRetry {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            new_nonce_hash2: <[u8; 16]>::deserialize(buf)?,
        })
    }
}

/// `dh_gen_fail#a69dae02`
#[derive(Clone, Debug, PartialEq)]
pub struct DhGenFail {
    pub nonce: [u8; 16],
    pub server_nonce: [u8; 16],
    pub new_nonce_hash3: [u8; 16],
}
impl_identifiable!(DhGenFail, 0xa69dae02);

impl Serializable for DhGenFail {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.nonce.serialize(buf);
        self.server_nonce.serialize(buf);
        self.new_nonce_hash3.serialize(buf);
    }
}

impl Deserializable for DhGenFail {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            nonce: <[u8; 16]>::deserialize(buf)?,
            server_nonce: <[u8; 16]>::deserialize(buf)?,
            new_nonce_hash3: <[u8; 16]>::deserialize(buf)?,
        })
    }
}

// ─── Service messages ────────────────────────────────────────────────────────

/// `msgs_ack#62d6b459`
#[derive(Clone, Debug, PartialEq)]
pub struct MsgsAck {
    pub msg_ids: Vec<i64>,
}
impl_identifiable!(MsgsAck, 0x62d6b459);

impl Serializable for MsgsAck {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.msg_ids.serialize(buf);
    }
}

impl Deserializable for MsgsAck {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { msg_ids: Vec::<i64>::deserialize(buf)? })
    }
}

/// `bad_msg_notification#a7eff811`
#[derive(Clone, Debug, PartialEq)]
pub struct BadMsgNotification {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
}
impl_identifiable!(BadMsgNotification, 0xa7eff811);

impl Serializable for BadMsgNotification {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
    }
}

impl Deserializable for BadMsgNotification {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            bad_msg_id: i64::deserialize(buf)?,
            bad_msg_seqno: i32::deserialize(buf)?,
            error_code: i32::deserialize(buf)?,
        })
    }
}

/// `bad_server_salt#edab447b`
#[derive(Clone, Debug, PartialEq)]
pub struct BadServerSalt {
    pub bad_msg_id: i64,
    pub bad_msg_seqno: i32,
    pub error_code: i32,
    pub new_server_salt: i64,
}
impl_identifiable!(BadServerSalt, 0xedab447b);

impl Serializable for BadServerSalt {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.bad_msg_id.serialize(buf);
        self.bad_msg_seqno.serialize(buf);
        self.error_code.serialize(buf);
        self.new_server_salt.serialize(buf);
    }
}

impl Deserializable for BadServerSalt {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            bad_msg_id: i64::deserialize(buf)?,
            bad_msg_seqno: i32::deserialize(buf)?,
            error_code: i32::deserialize(buf)?,
            new_server_salt: i64::deserialize(buf)?,
        })
    }
}

/// `new_session_created#9ec20908`
#[derive(Clone, Debug, PartialEq)]
pub struct NewSessionCreated {
    pub first_msg_id: i64,
    pub unique_id: i64,
    pub server_salt: i64,
}
impl_identifiable!(NewSessionCreated, 0x9ec20908);

impl Serializable for NewSessionCreated {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.first_msg_id.serialize(buf);
        self.unique_id.serialize(buf);
        self.server_salt.serialize(buf);
    }
}

impl Deserializable for NewSessionCreated {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            first_msg_id: i64::deserialize(buf)?,
            unique_id: i64::deserialize(buf)?,
            server_salt: i64::deserialize(buf)?,
        })
    }
}

/// `pong#347773c5`
#[derive(Clone, Debug, PartialEq)]
pub struct Pong {
    pub msg_id: i64,
    pub ping_id: i64,
}
impl_identifiable!(Pong, 0x347773c5);

impl Serializable for Pong {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.msg_id.serialize(buf);
        self.ping_id.serialize(buf);
    }
}

impl Deserializable for Pong {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { msg_id: i64::deserialize(buf)?, ping_id: i64::deserialize(buf)? })
    }
}

/// `rpc_error#2144ca19`
#[derive(Clone, Debug, PartialEq)]
pub struct RpcError {
    pub error_code: i32,
    pub error_message: String,
}
impl_identifiable!(RpcError, 0x2144ca19);

impl Serializable for RpcError {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.error_code.serialize(buf);
        self.error_message.serialize(buf);
    }
}

impl Deserializable for RpcError {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            error_code: i32::deserialize(buf)?,
            error_message: String::deserialize(buf)?,
        })
    }
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// `dcOption#2ec2a43c`
#[derive(Clone, Debug, PartialEq)]
pub struct DcOption {
    pub id: i32,
    pub hostname: String,
    pub ip_address: String,
    pub port: i32,
}
impl_identifiable!(DcOption, 0x2ec2a43c);

impl Serializable for DcOption {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.hostname.serialize(buf);
        self.ip_address.serialize(buf);
        self.port.serialize(buf);
    }
}

impl Deserializable for DcOption {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i32::deserialize(buf)?,
            hostname: String::deserialize(buf)?,
            ip_address: String::deserialize(buf)?,
            port: i32::deserialize(buf)?,
        })
    }
}

/// `config#7dae33e0`
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub date: i32,
    pub expires: i32,
    pub test_mode: bool,
    pub this_dc: i32,
    pub dc_options: Vec<enums::DcOption>,
    pub chat_size_max: i32,
}
impl_identifiable!(Config, 0x7dae33e0);

impl Serializable for Config {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.date.serialize(buf);
        self.expires.serialize(buf);
        self.test_mode.serialize(buf);
        self.this_dc.serialize(buf);
        self.dc_options.serialize(buf);
        self.chat_size_max.serialize(buf);
    }
}

impl Deserializable for Config {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            date: i32::deserialize(buf)?,
            expires: i32::deserialize(buf)?,
            test_mode: bool::deserialize(buf)?,
            this_dc: i32::deserialize(buf)?,
            dc_options: Vec::<enums::DcOption>::deserialize(buf)?,
            chat_size_max: i32::deserialize(buf)?,
        })
    }
}

// ─── Peers, users, chats ─────────────────────────────────────────────────────

/// `peerUser#9db1bc6d`
#[derive(Clone, Debug, PartialEq)]
pub struct PeerUser {
    pub user_id: i32,
}
impl_identifiable!(PeerUser, 0x9db1bc6d);

impl Serializable for PeerUser {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.user_id.serialize(buf);
    }
}

impl Deserializable for PeerUser {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { user_id: i32::deserialize(buf)? })
    }
}

/// `peerChat#bad0e5bb`
#[derive(Clone, Debug, PartialEq)]
pub struct PeerChat {
    pub chat_id: i32,
}
impl_identifiable!(PeerChat, 0xbad0e5bb);

impl Serializable for PeerChat {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.chat_id.serialize(buf);
    }
}

impl Deserializable for PeerChat {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { chat_id: i32::deserialize(buf)? })
    }
}

/// `userEmpty#200250ba`
#[derive(Clone, Debug, PartialEq)]
pub struct UserEmpty {
    pub id: i32,
}
impl_identifiable!(UserEmpty, 0x200250ba);

impl Serializable for UserEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
    }
}

impl Deserializable for UserEmpty {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i32::deserialize(buf)? })
    }
}

/// `user#22e49072`
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub photo: enums::UserProfilePhoto,
}
impl_identifiable!(User, 0x22e49072);

impl Serializable for User {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.first_name.serialize(buf);
        self.last_name.serialize(buf);
        self.phone.serialize(buf);
        self.photo.serialize(buf);
    }
}

impl Deserializable for User {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i32::deserialize(buf)?,
            first_name: String::deserialize(buf)?,
            last_name: String::deserialize(buf)?,
            phone: String::deserialize(buf)?,
            photo: enums::UserProfilePhoto::deserialize(buf)?,
        })
    }
}

/// `chatEmpty#9ba2d800`
#[derive(Clone, Debug, PartialEq)]
pub struct ChatEmpty {
    pub id: i32,
}
impl_identifiable!(ChatEmpty, 0x9ba2d800);

impl Serializable for ChatEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
    }
}

impl Deserializable for ChatEmpty {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i32::deserialize(buf)? })
    }
}

/// `chat#6e9c9bc7`
#[derive(Clone, Debug, PartialEq)]
pub struct Chat {
    pub id: i32,
    pub title: String,
    pub participants_count: i32,
    pub date: i32,
    pub version: i32,
}
impl_identifiable!(Chat, 0x6e9c9bc7);

impl Serializable for Chat {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.title.serialize(buf);
        self.participants_count.serialize(buf);
        self.date.serialize(buf);
        self.version.serialize(buf);
    }
}

impl Deserializable for Chat {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i32::deserialize(buf)?,
            title: String::deserialize(buf)?,
            participants_count: i32::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            version: i32::deserialize(buf)?,
        })
    }
}

// ─── File locations and photos ───────────────────────────────────────────────

/// `fileLocationUnavailable#7c596b46`
#[derive(Clone, Debug, PartialEq)]
pub struct FileLocationUnavailable {
    pub volume_id: i64,
    pub local_id: i32,
    pub secret: i64,
}
impl_identifiable!(FileLocationUnavailable, 0x7c596b46);

impl Serializable for FileLocationUnavailable {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.volume_id.serialize(buf);
        self.local_id.serialize(buf);
        self.secret.serialize(buf);
    }
}

impl Deserializable for FileLocationUnavailable {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            volume_id: i64::deserialize(buf)?,
            local_id: i32::deserialize(buf)?,
            secret: i64::deserialize(buf)?,
        })
    }
}

/// `fileLocation#53d69076`
#[derive(Clone, Debug, PartialEq)]
pub struct FileLocation {
    pub dc_id: i32,
    pub volume_id: i64,
    pub local_id: i32,
    pub secret: i64,
}
impl_identifiable!(FileLocation, 0x53d69076);

impl Serializable for FileLocation {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.dc_id.serialize(buf);
        self.volume_id.serialize(buf);
        self.local_id.serialize(buf);
        self.secret.serialize(buf);
    }
}

impl Deserializable for FileLocation {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            dc_id: i32::deserialize(buf)?,
            volume_id: i64::deserialize(buf)?,
            local_id: i32::deserialize(buf)?,
            secret: i64::deserialize(buf)?,
        })
    }
}

/// `userProfilePhoto#d559d8c8`
#[derive(Clone, Debug, PartialEq)]
pub struct UserProfilePhoto {
    pub photo_id: i64,
    pub photo_small: enums::FileLocation,
    pub photo_big: enums::FileLocation,
}
impl_identifiable!(UserProfilePhoto, 0xd559d8c8);

impl Serializable for UserProfilePhoto {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.photo_id.serialize(buf);
        self.photo_small.serialize(buf);
        self.photo_big.serialize(buf);
    }
}

impl Deserializable for UserProfilePhoto {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            photo_id: i64::deserialize(buf)?,
            photo_small: enums::FileLocation::deserialize(buf)?,
            photo_big: enums::FileLocation::deserialize(buf)?,
        })
    }
}

/// `photoSize#77bfb61b`
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoSize {
    pub r#type: String,
    pub location: enums::FileLocation,
    pub w: i32,
    pub h: i32,
    pub size: i32,
}
impl_identifiable!(PhotoSize, 0x77bfb61b);

impl Serializable for PhotoSize {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.r#type.serialize(buf);
        self.location.serialize(buf);
        self.w.serialize(buf);
        self.h.serialize(buf);
        self.size.serialize(buf);
    }
}

impl Deserializable for PhotoSize {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            r#type: String::deserialize(buf)?,
            location: enums::FileLocation::deserialize(buf)?,
            w: i32::deserialize(buf)?,
            h: i32::deserialize(buf)?,
            size: i32::deserialize(buf)?,
        })
    }
}

/// `photoSizeEmpty#0e17e23c`
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoSizeEmpty {
    pub r#type: String,
}
impl_identifiable!(PhotoSizeEmpty, 0x0e17e23c);

impl Serializable for PhotoSizeEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.r#type.serialize(buf);
    }
}

impl Deserializable for PhotoSizeEmpty {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { r#type: String::deserialize(buf)? })
    }
}

/// `photoEmpty#2331b22d`
#[derive(Clone, Debug, PartialEq)]
pub struct PhotoEmpty {
    pub id: i64,
}
impl_identifiable!(PhotoEmpty, 0x2331b22d);

impl Serializable for PhotoEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
    }
}

impl Deserializable for PhotoEmpty {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i64::deserialize(buf)? })
    }
}

/// `photo#22b56751`
#[derive(Clone, Debug, PartialEq)]
pub struct Photo {
    pub id: i64,
    pub access_hash: i64,
    pub date: i32,
    pub sizes: Vec<enums::PhotoSize>,
}
impl_identifiable!(Photo, 0x22b56751);

impl Serializable for Photo {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.access_hash.serialize(buf);
        self.date.serialize(buf);
        self.sizes.serialize(buf);
    }
}

impl Deserializable for Photo {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i64::deserialize(buf)?,
            access_hash: i64::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            sizes: Vec::<enums::PhotoSize>::deserialize(buf)?,
        })
    }
}

/// `document#9efc6326`
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub id: i64,
    pub access_hash: i64,
    pub date: i32,
    pub mime_type: String,
    pub size: i32,
    pub dc_id: i32,
}
impl_identifiable!(Document, 0x9efc6326);

impl Serializable for Document {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.access_hash.serialize(buf);
        self.date.serialize(buf);
        self.mime_type.serialize(buf);
        self.size.serialize(buf);
        self.dc_id.serialize(buf);
    }
}

impl Deserializable for Document {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i64::deserialize(buf)?,
            access_hash: i64::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            mime_type: String::deserialize(buf)?,
            size: i32::deserialize(buf)?,
            dc_id: i32::deserialize(buf)?,
        })
    }
}

// ─── Messages ────────────────────────────────────────────────────────────────

/// `messageEmpty#83e5de54`
#[derive(Clone, Debug, PartialEq)]
pub struct MessageEmpty {
    pub id: i32,
}
impl_identifiable!(MessageEmpty, 0x83e5de54);

impl Serializable for MessageEmpty {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
    }
}

impl Deserializable for MessageEmpty {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i32::deserialize(buf)? })
    }
}

/// `message#a7ab1991`
///
/// Flag bits: `0` unread, `1` out, `2` forward header, `3` reply header,
/// `9` media attachment.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub unread: bool,
    pub out: bool,
    pub id: i32,
    pub from_id: i32,
    pub to_id: enums::Peer,
    pub fwd_from_id: Option<i32>,
    pub fwd_date: Option<i32>,
    pub reply_to_msg_id: Option<i32>,
    pub date: i32,
    pub message: String,
    pub media: Option<enums::MessageMedia>,
}
impl_identifiable!(Message, 0xa7ab1991);

impl Message {
    /// The flags word as encoded on the wire.
    pub fn flags(&self) -> u32 {
        (self.unread as u32)
            | (self.out as u32) << 1
            | if self.fwd_from_id.is_some() { 1 << 2 } else { 0 }
            | if self.reply_to_msg_id.is_some() { 1 << 3 } else { 0 }
            | if self.media.is_some() { 1 << 9 } else { 0 }
    }
}

impl Serializable for Message {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.flags().serialize(buf);
        self.id.serialize(buf);
        self.from_id.serialize(buf);
        self.to_id.serialize(buf);
        self.fwd_from_id.serialize(buf);
        self.fwd_date.serialize(buf);
        self.reply_to_msg_id.serialize(buf);
        self.date.serialize(buf);
        self.message.serialize(buf);
        self.media.serialize(buf);
    }
}

impl Deserializable for Message {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            unread: flags & 1 != 0,
            out: flags & (1 << 1) != 0,
            id: i32::deserialize(buf)?,
            from_id: i32::deserialize(buf)?,
            to_id: enums::Peer::deserialize(buf)?,
            fwd_from_id: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            fwd_date: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            reply_to_msg_id: if flags & (1 << 3) != 0 { Some(i32::deserialize(buf)?) } else { None },
            date: i32::deserialize(buf)?,
            message: String::deserialize(buf)?,
            media: if flags & (1 << 9) != 0 {
                Some(enums::MessageMedia::deserialize(buf)?)
            } else {
                None
            },
        })
    }
}

// ─── Updates ─────────────────────────────────────────────────────────────────

/// `updateNewMessage#1f2b0afd`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateNewMessage {
    pub message: enums::Message,
    pub pts: u32,
    pub pts_count: u32,
}
impl_identifiable!(UpdateNewMessage, 0x1f2b0afd);

impl Serializable for UpdateNewMessage {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.message.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
    }
}

impl Deserializable for UpdateNewMessage {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            message: enums::Message::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
        })
    }
}

/// `updateMessageID#4e90bfd6`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateMessageId {
    pub id: i32,
    pub random_id: i64,
}
impl_identifiable!(UpdateMessageId, 0x4e90bfd6);

impl Serializable for UpdateMessageId {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.random_id.serialize(buf);
    }
}

impl Deserializable for UpdateMessageId {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i32::deserialize(buf)?, random_id: i64::deserialize(buf)? })
    }
}

/// `updateReadHistoryInbox#9961fd5c`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReadHistoryInbox {
    pub peer: enums::Peer,
    pub max_id: i32,
    pub pts: u32,
    pub pts_count: u32,
}
impl_identifiable!(UpdateReadHistoryInbox, 0x9961fd5c);

impl Serializable for UpdateReadHistoryInbox {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.peer.serialize(buf);
        self.max_id.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
    }
}

impl Deserializable for UpdateReadHistoryInbox {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            peer: enums::Peer::deserialize(buf)?,
            max_id: i32::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
        })
    }
}

/// `updateReadHistoryOutbox#2f2f21bf`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReadHistoryOutbox {
    pub peer: enums::Peer,
    pub max_id: i32,
    pub pts: u32,
    pub pts_count: u32,
}
impl_identifiable!(UpdateReadHistoryOutbox, 0x2f2f21bf);

impl Serializable for UpdateReadHistoryOutbox {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.peer.serialize(buf);
        self.max_id.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
    }
}

impl Deserializable for UpdateReadHistoryOutbox {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            peer: enums::Peer::deserialize(buf)?,
            max_id: i32::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
        })
    }
}

/// `updateDeleteMessages#a20db0e5`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDeleteMessages {
    pub messages: Vec<i32>,
    pub pts: u32,
    pub pts_count: u32,
}
impl_identifiable!(UpdateDeleteMessages, 0xa20db0e5);

impl Serializable for UpdateDeleteMessages {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.messages.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
    }
}

impl Deserializable for UpdateDeleteMessages {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            messages: Vec::<i32>::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
        })
    }
}

/// `updateReadMessagesContents#68c13933`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateReadMessagesContents {
    pub messages: Vec<i32>,
    pub pts: u32,
    pub pts_count: u32,
}
impl_identifiable!(UpdateReadMessagesContents, 0x68c13933);

impl Serializable for UpdateReadMessagesContents {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.messages.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
    }
}

impl Deserializable for UpdateReadMessagesContents {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            messages: Vec::<i32>::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
        })
    }
}

/// `updateUserTyping#5c486927`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateUserTyping {
    pub user_id: i32,
    pub action: enums::SendMessageAction,
}
impl_identifiable!(UpdateUserTyping, 0x5c486927);

impl Serializable for UpdateUserTyping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.user_id.serialize(buf);
        self.action.serialize(buf);
    }
}

impl Deserializable for UpdateUserTyping {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            user_id: i32::deserialize(buf)?,
            action: enums::SendMessageAction::deserialize(buf)?,
        })
    }
}

/// `updateChatUserTyping#9a65ea1f`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateChatUserTyping {
    pub chat_id: i32,
    pub user_id: i32,
    pub action: enums::SendMessageAction,
}
impl_identifiable!(UpdateChatUserTyping, 0x9a65ea1f);

impl Serializable for UpdateChatUserTyping {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.chat_id.serialize(buf);
        self.user_id.serialize(buf);
        self.action.serialize(buf);
    }
}

impl Deserializable for UpdateChatUserTyping {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            chat_id: i32::deserialize(buf)?,
            user_id: i32::deserialize(buf)?,
            action: enums::SendMessageAction::deserialize(buf)?,
        })
    }
}

/// `updateDcOptions#8e5e9873`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateDcOptions {
    pub dc_options: Vec<enums::DcOption>,
}
impl_identifiable!(UpdateDcOptions, 0x8e5e9873);

impl Serializable for UpdateDcOptions {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.dc_options.serialize(buf);
    }
}

impl Deserializable for UpdateDcOptions {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { dc_options: Vec::<enums::DcOption>::deserialize(buf)? })
    }
}

// ─── Updates containers ──────────────────────────────────────────────────────

/// `updateShortMessage#313bc7f8`
///
/// Flag bits match [`Message`]: `0` unread, `1` out, `2` forward, `3` reply.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShortMessage {
    pub unread: bool,
    pub out: bool,
    pub id: i32,
    pub user_id: i32,
    pub message: String,
    pub pts: u32,
    pub pts_count: u32,
    pub date: i32,
    pub fwd_from_id: Option<i32>,
    pub fwd_date: Option<i32>,
    pub reply_to_msg_id: Option<i32>,
}
impl_identifiable!(UpdateShortMessage, 0x313bc7f8);

impl UpdateShortMessage {
    /// The flags word as encoded on the wire.
    pub fn flags(&self) -> u32 {
        (self.unread as u32)
            | (self.out as u32) << 1
            | if self.fwd_from_id.is_some() { 1 << 2 } else { 0 }
            | if self.reply_to_msg_id.is_some() { 1 << 3 } else { 0 }
    }
}

impl Serializable for UpdateShortMessage {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.flags().serialize(buf);
        self.id.serialize(buf);
        self.user_id.serialize(buf);
        self.message.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
        self.date.serialize(buf);
        self.fwd_from_id.serialize(buf);
        self.fwd_date.serialize(buf);
        self.reply_to_msg_id.serialize(buf);
    }
}

impl Deserializable for UpdateShortMessage {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            unread: flags & 1 != 0,
            out: flags & (1 << 1) != 0,
            id: i32::deserialize(buf)?,
            user_id: i32::deserialize(buf)?,
            message: String::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            fwd_from_id: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            fwd_date: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            reply_to_msg_id: if flags & (1 << 3) != 0 { Some(i32::deserialize(buf)?) } else { None },
        })
    }
}

/// `updateShortChatMessage#4d6deea5`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShortChatMessage {
    pub unread: bool,
    pub out: bool,
    pub id: i32,
    pub from_id: i32,
    pub chat_id: i32,
    pub message: String,
    pub pts: u32,
    pub pts_count: u32,
    pub date: i32,
    pub fwd_from_id: Option<i32>,
    pub fwd_date: Option<i32>,
    pub reply_to_msg_id: Option<i32>,
}
impl_identifiable!(UpdateShortChatMessage, 0x4d6deea5);

impl UpdateShortChatMessage {
    /// The flags word as encoded on the wire.
    pub fn flags(&self) -> u32 {
        (self.unread as u32)
            | (self.out as u32) << 1
            | if self.fwd_from_id.is_some() { 1 << 2 } else { 0 }
            | if self.reply_to_msg_id.is_some() { 1 << 3 } else { 0 }
    }
}

impl Serializable for UpdateShortChatMessage {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.flags().serialize(buf);
        self.id.serialize(buf);
        self.from_id.serialize(buf);
        self.chat_id.serialize(buf);
        self.message.serialize(buf);
        self.pts.serialize(buf);
        self.pts_count.serialize(buf);
        self.date.serialize(buf);
        self.fwd_from_id.serialize(buf);
        self.fwd_date.serialize(buf);
        self.reply_to_msg_id.serialize(buf);
    }
}

impl Deserializable for UpdateShortChatMessage {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let flags = u32::deserialize(buf)?;
        Ok(Self {
            unread: flags & 1 != 0,
            out: flags & (1 << 1) != 0,
            id: i32::deserialize(buf)?,
            from_id: i32::deserialize(buf)?,
            chat_id: i32::deserialize(buf)?,
            message: String::deserialize(buf)?,
            pts: u32::deserialize(buf)?,
            pts_count: u32::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            fwd_from_id: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            fwd_date: if flags & (1 << 2) != 0 { Some(i32::deserialize(buf)?) } else { None },
            reply_to_msg_id: if flags & (1 << 3) != 0 { Some(i32::deserialize(buf)?) } else { None },
        })
    }
}

/// `updateShort#78d4dec1`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateShort {
    pub update: enums::Update,
    pub date: i32,
}
impl_identifiable!(UpdateShort, 0x78d4dec1);

impl Serializable for UpdateShort {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.update.serialize(buf);
        self.date.serialize(buf);
    }
}

impl Deserializable for UpdateShort {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { update: enums::Update::deserialize(buf)?, date: i32::deserialize(buf)? })
    }
}

/// `updatesCombined#725b04c3`
#[derive(Clone, Debug, PartialEq)]
pub struct UpdatesCombined {
    pub updates: Vec<enums::Update>,
    pub users: Vec<enums::User>,
    pub chats: Vec<enums::Chat>,
    pub date: i32,
    pub seq_start: u32,
    pub seq: u32,
}
impl_identifiable!(UpdatesCombined, 0x725b04c3);

impl Serializable for UpdatesCombined {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.updates.serialize(buf);
        self.users.serialize(buf);
        self.chats.serialize(buf);
        self.date.serialize(buf);
        self.seq_start.serialize(buf);
        self.seq.serialize(buf);
    }
}

impl Deserializable for UpdatesCombined {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            updates: Vec::<enums::Update>::deserialize(buf)?,
            users: Vec::<enums::User>::deserialize(buf)?,
            chats: Vec::<enums::Chat>::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            seq_start: u32::deserialize(buf)?,
            seq: u32::deserialize(buf)?,
        })
    }
}

/// `updates#74ae4240`
#[derive(Clone, Debug, PartialEq)]
pub struct Updates {
    pub updates: Vec<enums::Update>,
    pub users: Vec<enums::User>,
    pub chats: Vec<enums::Chat>,
    pub date: i32,
    pub seq: u32,
}
impl_identifiable!(Updates, 0x74ae4240);

impl Serializable for Updates {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.updates.serialize(buf);
        self.users.serialize(buf);
        self.chats.serialize(buf);
        self.date.serialize(buf);
        self.seq.serialize(buf);
    }
}

impl Deserializable for Updates {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            updates: Vec::<enums::Update>::deserialize(buf)?,
            users: Vec::<enums::User>::deserialize(buf)?,
            chats: Vec::<enums::Chat>::deserialize(buf)?,
            date: i32::deserialize(buf)?,
            seq: u32::deserialize(buf)?,
        })
    }
}

// ─── Input values ────────────────────────────────────────────────────────────

/// `inputUserContact#86e94f65`
#[derive(Clone, Debug, PartialEq)]
pub struct InputUserContact {
    pub user_id: i32,
}
impl_identifiable!(InputUserContact, 0x86e94f65);

impl Serializable for InputUserContact {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.user_id.serialize(buf);
    }
}

impl Deserializable for InputUserContact {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { user_id: i32::deserialize(buf)? })
    }
}

/// `inputPeerContact#1023dbe8`
#[derive(Clone, Debug, PartialEq)]
pub struct InputPeerContact {
    pub user_id: i32,
}
impl_identifiable!(InputPeerContact, 0x1023dbe8);

impl Serializable for InputPeerContact {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.user_id.serialize(buf);
    }
}

impl Deserializable for InputPeerContact {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { user_id: i32::deserialize(buf)? })
    }
}

/// `inputPeerChat#179be863`
#[derive(Clone, Debug, PartialEq)]
pub struct InputPeerChat {
    pub chat_id: i32,
}
impl_identifiable!(InputPeerChat, 0x179be863);

impl Serializable for InputPeerChat {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.chat_id.serialize(buf);
    }
}

impl Deserializable for InputPeerChat {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { chat_id: i32::deserialize(buf)? })
    }
}

/// `inputFile#f52ff27f`
#[derive(Clone, Debug, PartialEq)]
pub struct InputFile {
    pub id: i64,
    pub parts: i32,
    pub name: String,
    pub md5_checksum: String,
}
impl_identifiable!(InputFile, 0xf52ff27f);

impl Serializable for InputFile {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.parts.serialize(buf);
        self.name.serialize(buf);
        self.md5_checksum.serialize(buf);
    }
}

impl Deserializable for InputFile {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i64::deserialize(buf)?,
            parts: i32::deserialize(buf)?,
            name: String::deserialize(buf)?,
            md5_checksum: String::deserialize(buf)?,
        })
    }
}

/// `inputFileBig#fa4f0bb5`
#[derive(Clone, Debug, PartialEq)]
pub struct InputFileBig {
    pub id: i64,
    pub parts: i32,
    pub name: String,
}
impl_identifiable!(InputFileBig, 0xfa4f0bb5);

impl Serializable for InputFileBig {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.parts.serialize(buf);
        self.name.serialize(buf);
    }
}

impl Deserializable for InputFileBig {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            id: i64::deserialize(buf)?,
            parts: i32::deserialize(buf)?,
            name: String::deserialize(buf)?,
        })
    }
}

/// `inputFileLocation#14637196`
#[derive(Clone, Debug, PartialEq)]
pub struct InputFileLocation {
    pub volume_id: i64,
    pub local_id: i32,
    pub secret: i64,
}
impl_identifiable!(InputFileLocation, 0x14637196);

impl Serializable for InputFileLocation {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.volume_id.serialize(buf);
        self.local_id.serialize(buf);
        self.secret.serialize(buf);
    }
}

impl Deserializable for InputFileLocation {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self {
            volume_id: i64::deserialize(buf)?,
            local_id: i32::deserialize(buf)?,
            secret: i64::deserialize(buf)?,
        })
    }
}

/// `inputDocumentFileLocation#4e45abe9`
#[derive(Clone, Debug, PartialEq)]
pub struct InputDocumentFileLocation {
    pub id: i64,
    pub access_hash: i64,
}
impl_identifiable!(InputDocumentFileLocation, 0x4e45abe9);

impl Serializable for InputDocumentFileLocation {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.id.serialize(buf);
        self.access_hash.serialize(buf);
    }
}

impl Deserializable for InputDocumentFileLocation {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { id: i64::deserialize(buf)?, access_hash: i64::deserialize(buf)? })
    }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

/// `contact#f911c994`
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    pub user_id: i32,
    pub mutual: bool,
}
impl_identifiable!(Contact, 0xf911c994);

impl Serializable for Contact {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        self.user_id.serialize(buf);
        self.mutual.serialize(buf);
    }
}

impl Deserializable for Contact {
    fn deserialize(buf: Buffer) -> Result<Self> {
        Ok(Self { user_id: i32::deserialize(buf)?, mutual: bool::deserialize(buf)? })
    }
}

// ─── Namespaced types ────────────────────────────────────────────────────────

pub mod auth {
    use super::*;

    /// `auth.sentCode#efed51d9`
    #[derive(Clone, Debug, PartialEq)]
    pub struct SentCode {
        pub phone_registered: bool,
        pub phone_code_hash: String,
        pub send_call_timeout: i32,
        pub is_password: bool,
    }
    impl_identifiable!(SentCode, 0xefed51d9);

    impl Serializable for SentCode {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.phone_registered.serialize(buf);
            self.phone_code_hash.serialize(buf);
            self.send_call_timeout.serialize(buf);
            self.is_password.serialize(buf);
        }
    }

    impl Deserializable for SentCode {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                phone_registered: bool::deserialize(buf)?,
                phone_code_hash: String::deserialize(buf)?,
                send_call_timeout: i32::deserialize(buf)?,
                is_password: bool::deserialize(buf)?,
            })
        }
    }

    /// `auth.authorization#f6b673a4`
    #[derive(Clone, Debug, PartialEq)]
    pub struct Authorization {
        pub expires: i32,
        pub user: enums::User,
    }
    impl_identifiable!(Authorization, 0xf6b673a4);

    impl Serializable for Authorization {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.expires.serialize(buf);
            self.user.serialize(buf);
        }
    }

    impl Deserializable for Authorization {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                expires: i32::deserialize(buf)?,
                user: enums::User::deserialize(buf)?,
            })
        }
    }

    /// `auth.exportedAuthorization#df969c2d`
    #[derive(Clone, Debug, PartialEq)]
    pub struct ExportedAuthorization {
        pub id: i32,
        pub bytes: Vec<u8>,
    }
    impl_identifiable!(ExportedAuthorization, 0xdf969c2d);

    impl Serializable for ExportedAuthorization {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.id.serialize(buf);
            self.bytes.serialize(buf);
        }
    }

    impl Deserializable for ExportedAuthorization {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self { id: i32::deserialize(buf)?, bytes: Vec::<u8>::deserialize(buf)? })
        }
    }
}

pub mod account {
    use super::*;

    /// `account.noPassword#96dabc18`
    #[derive(Clone, Debug, PartialEq)]
    pub struct NoPassword {
        pub new_salt: Vec<u8>,
        pub email_unconfirmed_pattern: String,
    }
    impl_identifiable!(NoPassword, 0x96dabc18);

    impl Serializable for NoPassword {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.new_salt.serialize(buf);
            self.email_unconfirmed_pattern.serialize(buf);
        }
    }

    impl Deserializable for NoPassword {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                new_salt: Vec::<u8>::deserialize(buf)?,
                email_unconfirmed_pattern: String::deserialize(buf)?,
            })
        }
    }

    /// `account.password#7c18141c`
    #[derive(Clone, Debug, PartialEq)]
    pub struct Password {
        pub current_salt: Vec<u8>,
        pub new_salt: Vec<u8>,
        pub hint: String,
        pub has_recovery: bool,
        pub email_unconfirmed_pattern: String,
    }
    impl_identifiable!(Password, 0x7c18141c);

    impl Serializable for Password {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.current_salt.serialize(buf);
            self.new_salt.serialize(buf);
            self.hint.serialize(buf);
            self.has_recovery.serialize(buf);
            self.email_unconfirmed_pattern.serialize(buf);
        }
    }

    impl Deserializable for Password {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                current_salt: Vec::<u8>::deserialize(buf)?,
                new_salt: Vec::<u8>::deserialize(buf)?,
                hint: String::deserialize(buf)?,
                has_recovery: bool::deserialize(buf)?,
                email_unconfirmed_pattern: String::deserialize(buf)?,
            })
        }
    }
}

pub mod contacts {
    use super::*;

    /// `contacts.contacts#6f8b8cb2`
    #[derive(Clone, Debug, PartialEq)]
    pub struct Contacts {
        pub contacts: Vec<enums::Contact>,
        pub users: Vec<enums::User>,
    }
    impl_identifiable!(Contacts, 0x6f8b8cb2);

    impl Serializable for Contacts {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.contacts.serialize(buf);
            self.users.serialize(buf);
        }
    }

    impl Deserializable for Contacts {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                contacts: Vec::<enums::Contact>::deserialize(buf)?,
                users: Vec::<enums::User>::deserialize(buf)?,
            })
        }
    }
}

pub mod messages {
    use super::*;

    /// `messages.chats#64ff9fd5`
    #[derive(Clone, Debug, PartialEq)]
    pub struct Chats {
        pub chats: Vec<enums::Chat>,
    }
    impl_identifiable!(Chats, 0x64ff9fd5);

    impl Serializable for Chats {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.chats.serialize(buf);
        }
    }

    impl Deserializable for Chats {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self { chats: Vec::<enums::Chat>::deserialize(buf)? })
        }
    }
}

pub mod upload {
    use super::*;

    /// `upload.file#096a18d5`
    #[derive(Clone, Debug, PartialEq)]
    pub struct File {
        pub r#type: enums::storage::FileType,
        pub mtime: i32,
        pub bytes: Vec<u8>,
    }
    impl_identifiable!(File, 0x096a18d5);

    impl Serializable for File {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.r#type.serialize(buf);
            self.mtime.serialize(buf);
            self.bytes.serialize(buf);
        }
    }

    impl Deserializable for File {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                r#type: enums::storage::FileType::deserialize(buf)?,
                mtime: i32::deserialize(buf)?,
                bytes: Vec::<u8>::deserialize(buf)?,
            })
        }
    }
}

pub mod updates {
    use super::*;

    /// `updates.state#a56c2a3e`
    #[derive(Clone, Debug, PartialEq)]
    pub struct State {
        pub pts: u32,
        pub qts: u32,
        pub date: u32,
        pub seq: u32,
        pub unread_count: i32,
    }
    impl_identifiable!(State, 0xa56c2a3e);

    impl Serializable for State {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.pts.serialize(buf);
            self.qts.serialize(buf);
            self.date.serialize(buf);
            self.seq.serialize(buf);
            self.unread_count.serialize(buf);
        }
    }

    impl Deserializable for State {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                pts: u32::deserialize(buf)?,
                qts: u32::deserialize(buf)?,
                date: u32::deserialize(buf)?,
                seq: u32::deserialize(buf)?,
                unread_count: i32::deserialize(buf)?,
            })
        }
    }

    /// `updates.differenceEmpty#5d75a138`
    #[derive(Clone, Debug, PartialEq)]
    pub struct DifferenceEmpty {
        pub date: u32,
        pub seq: u32,
    }
    impl_identifiable!(DifferenceEmpty, 0x5d75a138);

    impl Serializable for DifferenceEmpty {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.date.serialize(buf);
            self.seq.serialize(buf);
        }
    }

    impl Deserializable for DifferenceEmpty {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self { date: u32::deserialize(buf)?, seq: u32::deserialize(buf)? })
        }
    }

    /// `updates.difference#00f49ca0`
    #[derive(Clone, Debug, PartialEq)]
    pub struct Difference {
        pub new_messages: Vec<enums::Message>,
        pub other_updates: Vec<enums::Update>,
        pub chats: Vec<enums::Chat>,
        pub users: Vec<enums::User>,
        pub state: State,
    }
    impl_identifiable!(Difference, 0x00f49ca0);

    impl Serializable for Difference {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.new_messages.serialize(buf);
            self.other_updates.serialize(buf);
            self.chats.serialize(buf);
            self.users.serialize(buf);
            State::CONSTRUCTOR_ID.serialize(buf);
            self.state.serialize(buf);
        }
    }

    impl Deserializable for Difference {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                new_messages: Vec::<enums::Message>::deserialize(buf)?,
                other_updates: Vec::<enums::Update>::deserialize(buf)?,
                chats: Vec::<enums::Chat>::deserialize(buf)?,
                users: Vec::<enums::User>::deserialize(buf)?,
                state: {
                    let id = u32::deserialize(buf)?;
                    if id != State::CONSTRUCTOR_ID {
                        return Err(buf.unexpected_id(id));
                    }
                    State::deserialize(buf)?
                },
            })
        }
    }

    /// `updates.differenceSlice#a8fb1981`
    #[derive(Clone, Debug, PartialEq)]
    pub struct DifferenceSlice {
        pub new_messages: Vec<enums::Message>,
        pub other_updates: Vec<enums::Update>,
        pub chats: Vec<enums::Chat>,
        pub users: Vec<enums::User>,
        pub intermediate_state: State,
    }
    impl_identifiable!(DifferenceSlice, 0xa8fb1981);

    impl Serializable for DifferenceSlice {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.new_messages.serialize(buf);
            self.other_updates.serialize(buf);
            self.chats.serialize(buf);
            self.users.serialize(buf);
            State::CONSTRUCTOR_ID.serialize(buf);
            self.intermediate_state.serialize(buf);
        }
    }

    impl Deserializable for DifferenceSlice {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self {
                new_messages: Vec::<enums::Message>::deserialize(buf)?,
                other_updates: Vec::<enums::Update>::deserialize(buf)?,
                chats: Vec::<enums::Chat>::deserialize(buf)?,
                users: Vec::<enums::User>::deserialize(buf)?,
                intermediate_state: {
                    let id = u32::deserialize(buf)?;
                    if id != State::CONSTRUCTOR_ID {
                        return Err(buf.unexpected_id(id));
                    }
                    State::deserialize(buf)?
                },
            })
        }
    }

    /// `updates.differenceTooLong#4afe8f6d`
    #[derive(Clone, Debug, PartialEq)]
    pub struct DifferenceTooLong {
        pub pts: u32,
    }
    impl_identifiable!(DifferenceTooLong, 0x4afe8f6d);

    impl Serializable for DifferenceTooLong {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            self.pts.serialize(buf);
        }
    }

    impl Deserializable for DifferenceTooLong {
        fn deserialize(buf: Buffer) -> Result<Self> {
            Ok(Self { pts: u32::deserialize(buf)? })
        }
    }
}
