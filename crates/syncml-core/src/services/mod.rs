//! External collaborators: token cache, device registry, payload codec.

pub mod codec;
pub mod mock;
pub mod traits;

pub use codec::LineCodec;
pub use mock::{InMemoryTokenCache, MockRegistry, RegistryCall};
pub use traits::{
    CacheEntry, CodecError, DeviceManagementError, DeviceRegistry, OperationManagementError,
    PayloadCodec, TokenCache,
};
