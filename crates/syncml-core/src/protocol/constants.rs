// Message sequencing
pub const SYNCML_FIRST_MESSAGE: u32 = 1;
pub const SYNCML_SECOND_MESSAGE: u32 = 2;
pub const SESSION_ID_FIRST: u32 = 1;
pub const SESSION_ID_SECOND: u32 = 2;

// Device type stamped on every identifier derived from a request
pub const DEVICE_TYPE_WINDOWS: &str = "WINDOWS";

// Transport status codes
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;

// Rejection body shared by 400 and 401 responses
pub const AUTHENTICATION_FAILURE: &str = "Authentication failure";

// Replace section layout (phase 1)
pub const DEVICE_ID_POSITION: usize = 0;
pub const DEVICE_MAN_POSITION: usize = 1;
pub const DEVICE_MODEL_POSITION: usize = 2;
pub const DEVICE_MOD_VER_POSITION: usize = 3;
pub const DEVICE_LANG_POSITION: usize = 4;

// Results section layout (phase 2); 3..=6 are reserved
pub const OS_VERSION_POSITION: usize = 0;
pub const IMSI_POSITION: usize = 1;
pub const IMEI_POSITION: usize = 2;
pub const VENDOR_POSITION: usize = 7;
pub const MAC_ADDRESS_POSITION: usize = 8;
pub const RESOLUTION_POSITION: usize = 9;
