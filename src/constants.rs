//! Application constants

/// Maximum accepted size of the uploaded image (1 MiB)
pub const MAX_IMAGE_UPLOAD_SIZE: usize = 1024 * 1024;

/// Room for multipart boundaries and part headers on top of the image itself.
/// The image limit is enforced per field; this only bounds the whole body.
pub const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// Side length of the square model input
pub const IMAGE_SIZE: usize = 224;

/// Scores strictly above this are classified as cancer
pub const CANCER_THRESHOLD: f32 = 0.58;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;

/// Default Postgres pool size
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

// Response messages
pub const MSG_PREDICT_SUCCESS: &str = "Prediksi berhasil dilakukan";
pub const MSG_MODEL_NOT_READY: &str = "Model belum siap untuk digunakan.";
pub const MSG_EMPTY_UPLOAD: &str = "Tidak ada file yang diunggah atau file kosong.";
pub const MSG_PREDICT_FAILED: &str = "Terjadi kesalahan dalam melakukan prediksi.";
pub const MSG_UPLOAD_TOO_LARGE: &str = "Ukuran file melebihi batas maksimal: 1MB";
pub const MSG_NOT_AN_IMAGE: &str = "File harus berupa gambar.";
pub const MSG_HISTORY_FAILED: &str = "Terjadi kesalahan saat mengambil data riwayat prediksi.";
pub const MSG_SERVER_ERROR: &str = "Terjadi kesalahan pada server.";
