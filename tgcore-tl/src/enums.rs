//! Boxed types as `enum`s. Serialization writes the variant's 32-bit
//! constructor ID followed by its fields; deserialization dispatches on the
//! ID and rejects anything unknown with the offending tag and offset.

use crate::deserialize::{Buffer, Result};
use crate::{types, Deserializable, Identifiable, Serializable};

macro_rules! impl_boxed {
    ($name:ident { $( $variant:ident($ty:path) ),+ $(,)? }) => {
        impl Serializable for $name {
            fn serialize(&self, buf: &mut impl Extend<u8>) {
                match self {
                    $( Self::$variant(x) => {
                        <$ty>::CONSTRUCTOR_ID.serialize(buf);
                        x.serialize(buf);
                    } )+
                }
            }
        }

        impl Deserializable for $name {
            fn deserialize(buf: Buffer) -> Result<Self> {
                let id = u32::deserialize(buf)?;
                Ok(match id {
                    $( <$ty>::CONSTRUCTOR_ID => Self::$variant(<$ty>::deserialize(buf)?), )+
                    _ => return Err(buf.unexpected_id(id)),
                })
            }
        }
    };
}

// ─── Key exchange ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum ResPq {
    ResPq(types::ResPq),
}
impl_boxed!(ResPq { ResPq(types::ResPq) });

#[derive(Clone, Debug, PartialEq)]
pub enum PQInnerData {
    PQInnerData(types::PQInnerData),
}
impl_boxed!(PQInnerData { PQInnerData(types::PQInnerData) });

#[derive(Clone, Debug, PartialEq)]
pub enum ServerDhParams {
    Ok(types::ServerDhParamsOk),
    Fail(types::ServerDhParamsFail),
}
impl_boxed!(ServerDhParams {
    Ok(types::ServerDhParamsOk),
    Fail(types::ServerDhParamsFail),
});

#[derive(Clone, Debug, PartialEq)]
pub enum ServerDhInnerData {
    ServerDhInnerData(types::ServerDhInnerData),
}
impl_boxed!(ServerDhInnerData { ServerDhInnerData(types::ServerDhInnerData) });

#[derive(Clone, Debug, PartialEq)]
pub enum ClientDhInnerData {
    ClientDhInnerData(types::ClientDhInnerData),
}
impl_boxed!(ClientDhInnerData { ClientDhInnerData(types::ClientDhInnerData) });

#[derive(Clone, Debug, PartialEq)]
pub enum SetClientDhParamsAnswer {
    DhGenOk(types::DhGenOk),
    DhGenRetry(types::DhGenRetry),
    DhGenFail(types::DhGenFail),
}
impl_boxed!(SetClientDhParamsAnswer {
    DhGenOk(types::DhGenOk),
    DhGenRetry(types::DhGenRetry),
    DhGenFail(types::DhGenFail),
});

// ─── Service ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Pong {
    Pong(types::Pong),
}
impl_boxed!(Pong { Pong(types::Pong) });

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum DcOption {
    DcOption(types::DcOption),
}
impl_boxed!(DcOption { DcOption(types::DcOption) });

#[derive(Clone, Debug, PartialEq)]
pub enum Config {
    Config(types::Config),
}
impl_boxed!(Config { Config(types::Config) });

// ─── Peers, users, chats ─────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Peer {
    User(types::PeerUser),
    Chat(types::PeerChat),
}
impl_boxed!(Peer {
    User(types::PeerUser),
    Chat(types::PeerChat),
});

#[derive(Clone, Debug, PartialEq)]
pub enum User {
    Empty(types::UserEmpty),
    User(types::User),
}
impl_boxed!(User {
    Empty(types::UserEmpty),
    User(types::User),
});

#[derive(Clone, Debug, PartialEq)]
pub enum Chat {
    Empty(types::ChatEmpty),
    Chat(types::Chat),
}
impl_boxed!(Chat {
    Empty(types::ChatEmpty),
    Chat(types::Chat),
});

// ─── Files and media ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum FileLocation {
    Unavailable(types::FileLocationUnavailable),
    Location(types::FileLocation),
}
impl_boxed!(FileLocation {
    Unavailable(types::FileLocationUnavailable),
    Location(types::FileLocation),
});

/// `userProfilePhotoEmpty#4f11bae1` | `userProfilePhoto#d559d8c8`
#[derive(Clone, Debug, PartialEq)]
pub enum UserProfilePhoto {
    Empty,
    Photo(types::UserProfilePhoto),
}

impl Serializable for UserProfilePhoto {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => 0x4f11bae1u32.serialize(buf),
            Self::Photo(x) => {
                types::UserProfilePhoto::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
        }
    }
}

impl Deserializable for UserProfilePhoto {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0x4f11bae1 => Self::Empty,
            types::UserProfilePhoto::CONSTRUCTOR_ID => {
                Self::Photo(types::UserProfilePhoto::deserialize(buf)?)
            }
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PhotoSize {
    Empty(types::PhotoSizeEmpty),
    Size(types::PhotoSize),
}
impl_boxed!(PhotoSize {
    Empty(types::PhotoSizeEmpty),
    Size(types::PhotoSize),
});

#[derive(Clone, Debug, PartialEq)]
pub enum Photo {
    Empty(types::PhotoEmpty),
    Photo(types::Photo),
}
impl_boxed!(Photo {
    Empty(types::PhotoEmpty),
    Photo(types::Photo),
});

#[derive(Clone, Debug, PartialEq)]
pub enum Document {
    Document(types::Document),
}
impl_boxed!(Document { Document(types::Document) });

/// `messageMediaEmpty#3ded6320` | `messageMediaPhoto#c8c45a2a` |
/// `messageMediaDocument#2fda2204`
#[derive(Clone, Debug, PartialEq)]
pub enum MessageMedia {
    Empty,
    Photo(Photo),
    Document(Document),
}

impl Serializable for MessageMedia {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => 0x3ded6320u32.serialize(buf),
            Self::Photo(x) => {
                0xc8c45a2au32.serialize(buf);
                x.serialize(buf);
            }
            Self::Document(x) => {
                0x2fda2204u32.serialize(buf);
                x.serialize(buf);
            }
        }
    }
}

impl Deserializable for MessageMedia {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0x3ded6320 => Self::Empty,
            0xc8c45a2a => Self::Photo(Photo::deserialize(buf)?),
            0x2fda2204 => Self::Document(Document::deserialize(buf)?),
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    Empty(types::MessageEmpty),
    Message(types::Message),
}
impl_boxed!(Message {
    Empty(types::MessageEmpty),
    Message(types::Message),
});

// ─── Updates ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub enum Update {
    NewMessage(types::UpdateNewMessage),
    MessageId(types::UpdateMessageId),
    ReadHistoryInbox(types::UpdateReadHistoryInbox),
    ReadHistoryOutbox(types::UpdateReadHistoryOutbox),
    DeleteMessages(types::UpdateDeleteMessages),
    ReadMessagesContents(types::UpdateReadMessagesContents),
    UserTyping(types::UpdateUserTyping),
    ChatUserTyping(types::UpdateChatUserTyping),
    DcOptions(types::UpdateDcOptions),
}
impl_boxed!(Update {
    NewMessage(types::UpdateNewMessage),
    MessageId(types::UpdateMessageId),
    ReadHistoryInbox(types::UpdateReadHistoryInbox),
    ReadHistoryOutbox(types::UpdateReadHistoryOutbox),
    DeleteMessages(types::UpdateDeleteMessages),
    ReadMessagesContents(types::UpdateReadMessagesContents),
    UserTyping(types::UpdateUserTyping),
    ChatUserTyping(types::UpdateChatUserTyping),
    DcOptions(types::UpdateDcOptions),
});

/// `updatesTooLong#e317af7e` plus the five carrier constructors.
#[derive(Clone, Debug, PartialEq)]
pub enum Updates {
    TooLong,
    ShortMessage(types::UpdateShortMessage),
    ShortChatMessage(types::UpdateShortChatMessage),
    Short(types::UpdateShort),
    Combined(types::UpdatesCombined),
    Updates(types::Updates),
}

impl Serializable for Updates {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::TooLong => 0xe317af7eu32.serialize(buf),
            Self::ShortMessage(x) => {
                types::UpdateShortMessage::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
            Self::ShortChatMessage(x) => {
                types::UpdateShortChatMessage::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
            Self::Short(x) => {
                types::UpdateShort::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
            Self::Combined(x) => {
                types::UpdatesCombined::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
            Self::Updates(x) => {
                types::Updates::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
        }
    }
}

impl Deserializable for Updates {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0xe317af7e => Self::TooLong,
            types::UpdateShortMessage::CONSTRUCTOR_ID => {
                Self::ShortMessage(types::UpdateShortMessage::deserialize(buf)?)
            }
            types::UpdateShortChatMessage::CONSTRUCTOR_ID => {
                Self::ShortChatMessage(types::UpdateShortChatMessage::deserialize(buf)?)
            }
            types::UpdateShort::CONSTRUCTOR_ID => {
                Self::Short(types::UpdateShort::deserialize(buf)?)
            }
            types::UpdatesCombined::CONSTRUCTOR_ID => {
                Self::Combined(types::UpdatesCombined::deserialize(buf)?)
            }
            types::Updates::CONSTRUCTOR_ID => Self::Updates(types::Updates::deserialize(buf)?),
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

// ─── Actions ─────────────────────────────────────────────────────────────────

/// `sendMessageTypingAction#16bf744e` | `sendMessageCancelAction#fd5ec8f5`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendMessageAction {
    Typing,
    Cancel,
}

impl Serializable for SendMessageAction {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        let id: u32 = match self {
            Self::Typing => 0x16bf744e,
            Self::Cancel => 0xfd5ec8f5,
        };
        id.serialize(buf);
    }
}

impl Deserializable for SendMessageAction {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0x16bf744e => Self::Typing,
            0xfd5ec8f5 => Self::Cancel,
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

// ─── Input values ────────────────────────────────────────────────────────────

/// `inputUserEmpty#b98886cf` | `inputUserSelf#f7c1b13f` |
/// `inputUserContact#86e94f65`
#[derive(Clone, Debug, PartialEq)]
pub enum InputUser {
    Empty,
    UserSelf,
    Contact(types::InputUserContact),
}

impl Serializable for InputUser {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => 0xb98886cfu32.serialize(buf),
            Self::UserSelf => 0xf7c1b13fu32.serialize(buf),
            Self::Contact(x) => {
                types::InputUserContact::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
        }
    }
}

impl Deserializable for InputUser {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0xb98886cf => Self::Empty,
            0xf7c1b13f => Self::UserSelf,
            types::InputUserContact::CONSTRUCTOR_ID => {
                Self::Contact(types::InputUserContact::deserialize(buf)?)
            }
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

/// `inputPeerEmpty#7f3b18ea` | `inputPeerSelf#7da07ec9` |
/// `inputPeerContact#1023dbe8` | `inputPeerChat#179be863`
#[derive(Clone, Debug, PartialEq)]
pub enum InputPeer {
    Empty,
    PeerSelf,
    Contact(types::InputPeerContact),
    Chat(types::InputPeerChat),
}

impl Serializable for InputPeer {
    fn serialize(&self, buf: &mut impl Extend<u8>) {
        match self {
            Self::Empty => 0x7f3b18eau32.serialize(buf),
            Self::PeerSelf => 0x7da07ec9u32.serialize(buf),
            Self::Contact(x) => {
                types::InputPeerContact::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
            Self::Chat(x) => {
                types::InputPeerChat::CONSTRUCTOR_ID.serialize(buf);
                x.serialize(buf);
            }
        }
    }
}

impl Deserializable for InputPeer {
    fn deserialize(buf: Buffer) -> Result<Self> {
        let id = u32::deserialize(buf)?;
        Ok(match id {
            0x7f3b18ea => Self::Empty,
            0x7da07ec9 => Self::PeerSelf,
            types::InputPeerContact::CONSTRUCTOR_ID => {
                Self::Contact(types::InputPeerContact::deserialize(buf)?)
            }
            types::InputPeerChat::CONSTRUCTOR_ID => {
                Self::Chat(types::InputPeerChat::deserialize(buf)?)
            }
            _ => return Err(buf.unexpected_id(id)),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputFile {
    File(types::InputFile),
    Big(types::InputFileBig),
}
impl_boxed!(InputFile {
    File(types::InputFile),
    Big(types::InputFileBig),
});

#[derive(Clone, Debug, PartialEq)]
pub enum InputFileLocation {
    Location(types::InputFileLocation),
    Document(types::InputDocumentFileLocation),
}
impl_boxed!(InputFileLocation {
    Location(types::InputFileLocation),
    Document(types::InputDocumentFileLocation),
});

#[derive(Clone, Debug, PartialEq)]
pub enum Contact {
    Contact(types::Contact),
}
impl_boxed!(Contact { Contact(types::Contact) });

// ─── Namespaced enums ────────────────────────────────────────────────────────

pub mod auth {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum SentCode {
        SentCode(types::auth::SentCode),
    }
    impl_boxed!(SentCode { SentCode(types::auth::SentCode) });

    #[derive(Clone, Debug, PartialEq)]
    pub enum Authorization {
        Authorization(types::auth::Authorization),
    }
    impl_boxed!(Authorization { Authorization(types::auth::Authorization) });

    #[derive(Clone, Debug, PartialEq)]
    pub enum ExportedAuthorization {
        ExportedAuthorization(types::auth::ExportedAuthorization),
    }
    impl_boxed!(ExportedAuthorization {
        ExportedAuthorization(types::auth::ExportedAuthorization)
    });
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Password {
        NoPassword(types::account::NoPassword),
        Password(types::account::Password),
    }
    impl_boxed!(Password {
        NoPassword(types::account::NoPassword),
        Password(types::account::Password),
    });
}

pub mod contacts {
    use super::*;

    /// `contacts.contactsNotModified#b74ba9d2` | `contacts.contacts#6f8b8cb2`
    #[derive(Clone, Debug, PartialEq)]
    pub enum Contacts {
        NotModified,
        Contacts(types::contacts::Contacts),
    }

    impl Serializable for Contacts {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            match self {
                Self::NotModified => 0xb74ba9d2u32.serialize(buf),
                Self::Contacts(x) => {
                    types::contacts::Contacts::CONSTRUCTOR_ID.serialize(buf);
                    x.serialize(buf);
                }
            }
        }
    }

    impl Deserializable for Contacts {
        fn deserialize(buf: Buffer) -> Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                0xb74ba9d2 => Self::NotModified,
                types::contacts::Contacts::CONSTRUCTOR_ID => {
                    Self::Contacts(types::contacts::Contacts::deserialize(buf)?)
                }
                _ => return Err(buf.unexpected_id(id)),
            })
        }
    }
}

pub mod messages {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Chats {
        Chats(types::messages::Chats),
    }
    impl_boxed!(Chats { Chats(types::messages::Chats) });
}

pub mod storage {
    use super::*;

    /// `storage.fileUnknown#aa963b05` | `storage.fileJpeg#007efe0e` |
    /// `storage.filePng#0a4f63c0`
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum FileType {
        Unknown,
        Jpeg,
        Png,
    }

    impl Serializable for FileType {
        fn serialize(&self, buf: &mut impl Extend<u8>) {
            let id: u32 = match self {
                Self::Unknown => 0xaa963b05,
                Self::Jpeg => 0x007efe0e,
                Self::Png => 0x0a4f63c0,
            };
            id.serialize(buf);
        }
    }

    impl Deserializable for FileType {
        fn deserialize(buf: Buffer) -> Result<Self> {
            let id = u32::deserialize(buf)?;
            Ok(match id {
                0xaa963b05 => Self::Unknown,
                0x007efe0e => Self::Jpeg,
                0x0a4f63c0 => Self::Png,
                _ => return Err(buf.unexpected_id(id)),
            })
        }
    }
}

pub mod upload {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum File {
        File(types::upload::File),
    }
    impl_boxed!(File { File(types::upload::File) });
}

pub mod updates {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum State {
        State(types::updates::State),
    }
    impl_boxed!(State { State(types::updates::State) });

    #[derive(Clone, Debug, PartialEq)]
    pub enum Difference {
        Empty(types::updates::DifferenceEmpty),
        Difference(types::updates::Difference),
        Slice(types::updates::DifferenceSlice),
        TooLong(types::updates::DifferenceTooLong),
    }
    impl_boxed!(Difference {
        Empty(types::updates::DifferenceEmpty),
        Difference(types::updates::Difference),
        Slice(types::updates::DifferenceSlice),
        TooLong(types::updates::DifferenceTooLong),
    });
}
