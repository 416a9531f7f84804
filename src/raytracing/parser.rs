use log::error;
use thiserror::Error;

use super::{
    camera::Camera,
    core::{Material, Scene, Solid},
    light::{Attenuation, DirectionalLight, Light, PointLight, SpotLight},
    model::load_mesh,
    surface::{Mesh, Plane, Sphere, Triangle},
    Mat4, Vec3,
};

pub struct SceneParser {
    content: Vec<char>,
    buffer: Option<String>,
    position: FilePosition,
    /// Position of the first character of the last popped token.
    token_start: FilePosition,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilePosition {
    line: u32,
    column: u32,
    index: usize,
}

impl FilePosition {
    fn on_new_line(&mut self) {
        self.line += 1;
        self.column = 0;
        self.index += 1;
    }

    fn advance(&mut self) {
        self.column += 1;
        self.index += 1;
    }
}

#[derive(Error, Debug)]
#[error("{message} at {}:{}", .position.line + 1, .position.column + 1)]
pub struct ParserError {
    position: FilePosition,
    pub message: String,
}

impl ParserError {
    fn new(message: impl Into<String>, position: FilePosition) -> ParserError {
        ParserError {
            position,
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// Logs the error with the offending line and a caret under the column.
    pub fn print_error_location(&self, content: &str) {
        error!("{}", self);
        if let Some(line) = content.lines().nth(self.position.line as usize) {
            error!("{}", line);
            let spacing = " ".repeat(self.position.column as usize);
            error!("{}^", spacing);
        }
    }
}

type ParserResult<T> = Result<T, ParserError>;

#[derive(Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub scene: Scene,
}

const MATERIAL_KEYWORDS: [&str; 7] = [
    "ambient",
    "diffuse",
    "specular",
    "shininess",
    "reflection",
    "refraction",
    "index",
];

impl SceneParser {
    pub fn new(content: &str) -> SceneParser {
        SceneParser {
            content: content.chars().collect(),
            buffer: None,
            position: FilePosition::default(),
            token_start: FilePosition::default(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.content.get(self.position.index).copied()
    }

    fn is_empty(&mut self) -> bool {
        self.peek().is_empty()
    }

    fn advance(&mut self) {
        match self.current_char() {
            Some('\n') => self.position.on_new_line(),
            Some(_) => self.position.advance(),
            None => {}
        }
    }

    fn eat_spaces(&mut self) {
        // consume all the empty lines, spaces and comments before the next token
        while let Some(current_char) = self.current_char() {
            if current_char == '#' {
                while !matches!(self.current_char(), Some('\n') | None) {
                    self.advance();
                }
            } else if !current_char.is_whitespace() {
                break;
            }
            self.advance();
        }
    }

    /// Eats chars while `f` holds, appending them to `result`.
    fn take_while(&mut self, result: &mut String, f: impl Fn(char) -> bool) {
        while let Some(current_char) = self.current_char() {
            if !f(current_char) {
                break;
            }
            result.push(current_char);
            self.advance();
        }
    }

    fn pop(&mut self) -> String {
        // check if we already peeked without eating the next token
        if let Some(token) = self.buffer.take() {
            return token;
        }

        self.eat_spaces();
        self.token_start = self.position;
        let mut result = String::new();
        let Some(current_char) = self.current_char() else {
            return result;
        };

        match current_char {
            '"' => {
                result.push(current_char);
                self.advance();
                // do not handle escape for now
                self.take_while(&mut result, |c| c != '"');
                if self.current_char() == Some('"') {
                    result.push('"');
                    self.advance();
                }
            }
            '.' | '+' | '-' | '0'..='9' => {
                if current_char == '+' || current_char == '-' {
                    result.push(current_char);
                    self.advance();
                }
                self.take_while(&mut result, |c| c.is_ascii_digit());
                if self.current_char() == Some('.') {
                    result.push('.');
                    self.advance();
                    self.take_while(&mut result, |c| c.is_ascii_digit());
                }
                if matches!(self.current_char(), Some('e' | 'E')) {
                    result.push('e');
                    self.advance();
                    if let Some(sign @ ('+' | '-')) = self.current_char() {
                        result.push(sign);
                        self.advance();
                    }
                    self.take_while(&mut result, |c| c.is_ascii_digit());
                }
            }
            c if c.is_alphabetic() => {
                self.take_while(&mut result, |c| c.is_alphanumeric() || c == '_');
            }
            // every other char is a single char symbol: , ( ) [ ] >
            _ => {
                result.push(current_char);
                self.advance();
            }
        }
        result
    }

    fn peek(&mut self) -> &str {
        // peek always look ahead and save the result to the buffer
        if self.buffer.is_none() {
            let token = self.pop();
            self.buffer = Some(token);
        }
        self.buffer.as_deref().unwrap_or_default()
    }

    fn error<T>(&self, message: impl Into<String>) -> ParserResult<T> {
        Err(ParserError::new(message, self.token_start))
    }

    fn parse_float(&mut self) -> ParserResult<f64> {
        let next_token = self.pop();
        match next_token.parse::<f64>() {
            Ok(num) => Ok(num),
            Err(_) => self.error(format!("cannot interpret '{}' as a number", next_token)),
        }
    }

    fn parse_index(&mut self) -> ParserResult<usize> {
        let next_token = self.pop();
        match next_token.parse::<usize>() {
            Ok(index) => Ok(index),
            Err(_) => self.error(format!("expected a vertex index, found '{}'", next_token)),
        }
    }

    fn match_token(&mut self, expected_lexem: &str) -> ParserResult<()> {
        // match primitive: consume a lexem from the list and if is different
        // from the expected one raise an error
        let next_lexem = self.pop();
        if next_lexem != expected_lexem {
            self.error(format!(
                "expected '{}', found '{}' instead",
                expected_lexem, next_lexem
            ))
        } else {
            Ok(())
        }
    }

    fn maybe_match(&mut self, expected_lexem: &str) -> bool {
        // variant of match that can fail
        // if the expected lexem is the next in the stream, we consume it and returns true.
        // return false otherwise leaving the stream untouched
        if self.peek() == expected_lexem {
            self.pop();
            return true;
        }
        false
    }

    fn parse_dimension(&mut self) -> ParserResult<u32> {
        let next_token = self.pop();
        match next_token.parse::<u32>() {
            Ok(0) => self.error("image size must be at least 1x1"),
            Ok(dimension) => Ok(dimension),
            Err(_) => self.error(format!("expected an image size, found '{}'", next_token)),
        }
    }

    fn parse_header(&mut self) -> ParserResult<(u32, u32)> {
        self.match_token("size")?;
        let width = self.parse_dimension()?;
        let height = self.parse_dimension()?;
        Ok((width, height))
    }

    fn parse_vec3(&mut self) -> ParserResult<Vec3> {
        self.match_token("(")?;
        let x = self.parse_float()?;
        self.match_token(",")?;
        let y = self.parse_float()?;
        self.match_token(",")?;
        let z = self.parse_float()?;
        self.match_token(")")?;
        Ok(Vec3::new(x, y, z))
    }

    fn parse_face(&mut self) -> ParserResult<[usize; 3]> {
        self.match_token("(")?;
        let a = self.parse_index()?;
        self.match_token(",")?;
        let b = self.parse_index()?;
        self.match_token(",")?;
        let c = self.parse_index()?;
        self.match_token(")")?;
        Ok([a, b, c])
    }

    fn parse_color(&mut self) -> ParserResult<Vec3> {
        // predefined color
        let named = match self.peek() {
            "red" => Some(Vec3::new(1.0, 0.0, 0.0)),
            "blue" => Some(Vec3::new(0.0, 0.0, 1.0)),
            "green" => Some(Vec3::new(0.0, 1.0, 0.0)),
            "white" => Some(Vec3::one()),
            "black" => Some(Vec3::zero()),
            "cyan" => Some(Vec3::new(0.0, 1.0, 1.0)),
            "violet" => Some(Vec3::new(1.0, 0.0, 1.0)),
            "fuchsia" => Some(Vec3::new(0.96, 0.0, 0.96)),
            "yellow" => Some(Vec3::new(1.0, 1.0, 0.0)),
            "orange" => Some(Vec3::new(0.98, 0.45, 0.02)),
            "gray" => Some(Vec3::new(0.5, 0.5, 0.5)),
            _ => None,
        };
        match named {
            Some(color) => {
                self.pop();
                Ok(color)
            }
            None => self.parse_vec3(),
        }
    }

    fn next_is_material_keyword(&mut self) -> bool {
        let next_token = self.peek();
        MATERIAL_KEYWORDS.iter().any(|keyword| *keyword == next_token)
    }

    fn parse_material(&mut self) -> ParserResult<Material> {
        let mut material = Material::default();
        while self.next_is_material_keyword() {
            match self.pop().as_str() {
                "ambient" => material.ambient = self.parse_color()?,
                "diffuse" => material.diffuse = self.parse_color()?,
                "specular" => material.specular = self.parse_color()?,
                "shininess" => material.shininess = self.parse_float()?,
                "reflection" => material.reflection = self.parse_float()?,
                "refraction" => material.refraction = self.parse_float()?,
                _ => material.refraction_index = self.parse_float()?,
            }
        }
        if material.shininess < 0.0 {
            return self.error("shininess must not be negative");
        }
        if material.refraction_index < 1.0 {
            return self.error("refraction index must be at least 1");
        }
        Ok(material)
    }

    fn parse_sphere(&mut self) -> ParserResult<Solid> {
        self.match_token("sphere")?;
        let center = self.parse_vec3()?;
        let radius = self.parse_float()?;
        let material = self.parse_material()?;
        Ok(Sphere::new(center, radius).with_material(material).into())
    }

    fn parse_plane(&mut self) -> ParserResult<Solid> {
        self.match_token("plane")?;
        let normal = self.parse_vec3()?;
        let point = self.parse_vec3()?;
        let material = self.parse_material()?;
        Ok(Plane::new(normal, point).with_material(material).into())
    }

    fn parse_triangle(&mut self) -> ParserResult<Solid> {
        self.match_token("triangle")?;
        let a = self.parse_vec3()?;
        let b = self.parse_vec3()?;
        let c = self.parse_vec3()?;
        let triangle = Triangle::new(a, b, c);
        if triangle.is_degenerate() {
            return self.error("triangle has zero area");
        }
        let material = self.parse_material()?;
        Ok(triangle.with_material(material).into())
    }

    fn parse_list<T>(
        &mut self,
        mut parse_item: impl FnMut(&mut Self) -> ParserResult<T>,
    ) -> ParserResult<Vec<T>> {
        self.match_token("[")?;
        let mut items = Vec::new();
        while !self.maybe_match("]") {
            if self.is_empty() {
                return self.error("unterminated list, expected ']'");
            }
            items.push(parse_item(self)?);
        }
        Ok(items)
    }

    fn parse_mesh(&mut self) -> ParserResult<Solid> {
        self.match_token("mesh")?;
        let vertices = self.parse_list(Self::parse_vec3)?;
        let faces = self.parse_list(Self::parse_face)?;
        let mesh = match Mesh::new(&vertices, &faces) {
            Ok(mesh) => mesh,
            Err(err) => return self.error(err.to_string()),
        };
        let material = self.parse_material()?;
        Ok(mesh.with_material(material).into())
    }

    fn parse_string(&mut self) -> ParserResult<String> {
        let next_token = self.pop();
        match next_token
            .strip_prefix('"')
            .and_then(|token| token.strip_suffix('"'))
        {
            Some(content) if next_token.len() >= 2 => Ok(content.to_string()),
            _ => self.error(format!("expected a quoted string, found '{}'", next_token)),
        }
    }

    fn parse_camera(&mut self) -> ParserResult<Camera> {
        if self.maybe_match("camera") {
            self.match_token("from")?;
            let position = self.parse_vec3()?;
            Ok(Camera::new(position))
        } else {
            Ok(Camera::default())
        }
    }

    fn parse_ambient(&mut self) -> ParserResult<Vec3> {
        if self.maybe_match("ambient") {
            self.parse_color()
        } else {
            Ok(Vec3::zero())
        }
    }

    fn parse_trasformation(&mut self) -> ParserResult<Mat4> {
        let mut trasform = Mat4::identity();
        while self.maybe_match(">") {
            let next_trasform = match self.pop().as_str() {
                "scale" => Mat4::scale(self.parse_float()?),
                "translate" => Mat4::translate(self.parse_vec3()?),
                "rotate" => {
                    let axis = self.parse_vec3()?;
                    let angle = self.parse_float()?;
                    Mat4::rotate(axis, angle.to_radians())
                }
                other => {
                    return self.error(format!("unexpected transform '{}'", other));
                }
            };
            trasform = trasform.then(&next_trasform);
        }
        Ok(trasform)
    }

    fn parse_model(&mut self) -> ParserResult<Solid> {
        self.match_token("model")?;
        let path = self.parse_string()?;
        let material = self.parse_material()?;
        let trasform = self.parse_trasformation()?;
        match load_mesh(&path, &trasform, material) {
            Ok(mesh) => Ok(mesh.into()),
            Err(err) => self.error(format!("cannot load model \"{}\": {}", path, err)),
        }
    }

    fn parse_attenuation(&mut self) -> ParserResult<Attenuation> {
        if self.maybe_match("attenuation") {
            let coefficients = self.parse_vec3()?;
            Ok(Attenuation::new(coefficients.x, coefficients.y, coefficients.z))
        } else {
            Ok(Attenuation::NONE)
        }
    }

    fn parse_light(&mut self) -> ParserResult<Light> {
        self.match_token("light")?;
        match self.pop().as_str() {
            "directional" => {
                let direction = self.parse_vec3()?;
                let intensity = self.parse_color()?;
                Ok(DirectionalLight::new(intensity, direction).into())
            }
            "point" => {
                let position = self.parse_vec3()?;
                let intensity = self.parse_color()?;
                let attenuation = self.parse_attenuation()?;
                Ok(PointLight::new(intensity, position, attenuation).into())
            }
            "spot" => {
                let position = self.parse_vec3()?;
                let direction = self.parse_vec3()?;
                let intensity = self.parse_color()?;
                let attenuation = self.parse_attenuation()?;
                Ok(SpotLight::new(intensity, position, direction, attenuation).into())
            }
            other => self.error(format!(
                "unknown light '{}', expected directional, point or spot",
                other
            )),
        }
    }

    pub fn parse_scene(&mut self) -> ParserResult<ImageData> {
        // main routine that parse the whole file
        let (width, height) = self.parse_header()?;
        let camera = self.parse_camera()?;
        let mut scene = Scene::new(self.parse_ambient()?);

        while !self.is_empty() {
            let object = match self.peek() {
                "light" => {
                    let light = self.parse_light()?;
                    scene.add_light(light);
                    continue;
                }
                "sphere" => self.parse_sphere()?,
                "plane" => self.parse_plane()?,
                "triangle" => self.parse_triangle()?,
                "mesh" => self.parse_mesh()?,
                "model" => self.parse_model()?,
                other => {
                    let message = format!("unexpected token '{}'", other);
                    return self.error(message);
                }
            };
            scene.add_object(object);
        }
        Ok(ImageData {
            width,
            height,
            camera,
            scene,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raytracing::core::Surface;
    use crate::raytracing::light::LightSource;
    use crate::raytracing::math::vec3::assert_vec_eq;

    fn parse(content: &str) -> ParserResult<ImageData> {
        SceneParser::new(content).parse_scene()
    }

    #[test]
    fn parses_full_scene() {
        let data = parse(
            r#"
            size 320 240
            camera from (0, 0, 2)
            ambient (0.1, 0.2, 0.3)
            # lights
            light directional (0, 0, -1) white
            light point (1, 1, 1) (0.5, 0.5, 0.5) attenuation (1, 0.1, 0.01)
            light spot (0, 2, 0) (0, -1, 0) yellow
            sphere (0, 0, -1) 0.5 ambient red diffuse red specular white shininess 100 reflection 0.5
            plane (0, 1, 0) (0, -1, 0) diffuse (0.2, 0.2, 0.2)
            triangle (0, 0, -3) (1, 0, -3) (0, 1, -3) diffuse green refraction 0.4 index 1.5
            mesh [ (0, 0, -4) (1, 0, -4) (0, 1, -4) (1, 1, -4) ] [ (0, 1, 2) (1, 3, 2) ] diffuse blue
            "#,
        )
        .unwrap();
        assert_eq!((data.width, data.height), (320, 240));
        assert_eq!(data.camera, Camera::new(Vec3::new(0.0, 0.0, 2.0)));
        assert_vec_eq(data.scene.ambient, Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(data.scene.lights.len(), 3);
        assert_eq!(data.scene.objects.len(), 4);
        assert_eq!(data.scene.triangle_count(), 3);

        let sphere = data.scene.objects[0].material();
        assert_vec_eq(sphere.ambient, Vec3::new(1.0, 0.0, 0.0));
        assert_vec_eq(sphere.specular, Vec3::one());
        assert_eq!(sphere.shininess, 100.0);
        assert_eq!(sphere.reflection, 0.5);

        let triangle = data.scene.objects[2].material();
        assert_eq!(triangle.refraction, 0.4);
        assert_eq!(triangle.refraction_index, 1.5);

        let Solid::Mesh(mesh) = &data.scene.objects[3] else {
            panic!("expected a mesh");
        };
        assert!(mesh
            .triangles()
            .iter()
            .all(|t| t.material().diffuse == Vec3::new(0.0, 0.0, 1.0)));

        let point = &data.scene.lights[1];
        assert_eq!(point.distance_from_light(Vec3::new(1.0, 1.0, 0.0)), 1.0);
    }

    #[test]
    fn defaults_when_camera_and_ambient_are_missing() {
        let data = parse("size 10 10 sphere (0, 0, -1) 0.5").unwrap();
        assert_eq!(data.camera, Camera::default());
        assert!(data.scene.ambient.is_zero());
        assert_eq!(*data.scene.objects[0].material(), Material::default());
    }

    #[test]
    fn reports_error_position() {
        let err = parse("size 10 10\nsphere (0, 0, -1) 0.5\nbox (0, 0, 0)").unwrap_err();
        assert_eq!(err.line(), 2);
        assert!(err.message.contains("box"));
        assert_eq!(err.to_string(), "unexpected token 'box' at 3:1");
    }

    #[test]
    fn rejects_bad_number() {
        let err = parse("size 10 ten").unwrap_err();
        assert!(err.message.contains("ten"));
    }

    #[test]
    fn rejects_image_size_that_is_not_a_positive_integer() {
        for header in ["size inf 2", "size nan 4", "size 10.9 4", "size 0 4", "size 4 -1"] {
            let err = parse(header).unwrap_err();
            assert!(err.message.contains("image size"), "{}: {}", header, err);
            assert_eq!(err.line(), 0);
        }
        let data = parse("size 4294967295 2").unwrap();
        assert_eq!((data.width, data.height), (u32::MAX, 2));
    }

    #[test]
    fn rejects_mesh_face_out_of_range() {
        let err = parse("size 1 1 mesh [ (0, 0, 0) (1, 0, 0) (0, 1, 0) ] [ (0, 1, 3) ]")
            .unwrap_err();
        assert!(err.message.contains("vertex 3"));
    }

    #[test]
    fn rejects_unterminated_list() {
        let err = parse("size 1 1 mesh [ (0, 0, 0)").unwrap_err();
        assert!(err.message.contains("']'"));
    }

    #[test]
    fn rejects_unknown_light() {
        let err = parse("size 1 1 light area (0, 0, 0) white").unwrap_err();
        assert!(err.message.contains("area"));
    }

    #[test]
    fn parses_scientific_notation() {
        let data = parse("size 1 1 sphere (0, 0, -1e1) 2.5e-1").unwrap();
        let hit = data.scene.objects[0]
            .intersect(&crate::raytracing::math::Ray::new(Vec3::zero(), -Vec3::z_axis()))
            .unwrap();
        assert!((hit.t - 9.75).abs() < 1e-9);
    }

    #[test]
    fn parses_model_transformations() {
        let mut parser = SceneParser::new("> scale 2 > translate (1, 0, 0) > rotate (0, 0, 1) 90");
        let transform = parser.parse_trasformation().unwrap();
        assert_vec_eq(transform.apply(Vec3::x_axis()), Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn missing_model_file_is_reported() {
        let err = parse("size 1 1 model \"missing.obj\" diffuse white").unwrap_err();
        assert!(err.message.contains("missing.obj"));
    }
}
