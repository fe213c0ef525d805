use reqwest::multipart::{Form, Part};

use super::{
    client::ApiClient,
    crud::CrudApi,
    models::Employee,
    types::ApiError,
};

pub const EMPLOYEE_DETAIL_PATH: &str = "/api/portal/employeedetail";
const EMPLOYEE_UPLOAD_ROOT: &str = "/api/employees";
const IMAGE_FIELD: &str = "image";

/// A profile picture picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: None,
            bytes,
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    fn to_form(&self) -> Result<Form, ApiError> {
        let mut part = Part::bytes(self.bytes.clone()).file_name(self.file_name.clone());
        if let Some(mime) = &self.mime {
            part = part
                .mime_str(mime)
                .map_err(|_| ApiError::invalid_request(format!("invalid mime type: {}", mime)))?;
        }
        Ok(Form::new().part(IMAGE_FIELD, part))
    }
}

/// Raw outcome of an upload. The endpoint does not answer with an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: u16,
    pub body: String,
}

impl UploadReceipt {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct EmployeeApi {
    crud: CrudApi<Employee>,
}

impl EmployeeApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            crud: CrudApi::new(client, EMPLOYEE_DETAIL_PATH),
        }
    }

    /// Generic list/get/create/update/remove on the resource root.
    pub fn crud(&self) -> &CrudApi<Employee> {
        &self.crud
    }

    pub async fn upload_image(
        &self,
        employee_id: u64,
        image: &ImageUpload,
    ) -> Result<UploadReceipt, ApiError> {
        let path = format!("{}/{}/upload", EMPLOYEE_UPLOAD_ROOT, employee_id);
        let response = self
            .crud
            .client()
            .send_multipart(&path, || image.to_form())
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            log::warn!("image upload for employee {} answered {}", employee_id, status);
        }
        Ok(UploadReceipt { status, body })
    }
}
